//! Content collection.
//!
//! Resolves the `[sources]` and `[examples]` glob patterns against the
//! repository tree and produces the ordered list of [`SourceDocument`]s handed
//! to the documentation generator.
//!
//! ## Ordering
//!
//! Patterns are expanded one at a time: all `[sources]` patterns in the order
//! written, then all `[examples]` patterns. Each expansion walks the tree in
//! file-name order, so the output is the same on every run and every machine.
//! A file matched by more than one pattern is emitted once, at its first
//! match; later matches are dropped. Files are compared by canonical path, so
//! a symlink and its target count as one document.
//!
//! ## Matching
//!
//! Patterns are globs matched against the path relative to the root, with `/`
//! separators. `*` also crosses directory boundaries, so `*.md` finds both
//! `index.md` and `docs/post.md`; use `**` where the intent is explicit.
//!
//! ## Skipped entries
//!
//! The generator's artifact directory is never walked. Hidden entries (names
//! starting with `.`) are only collected by a pattern that names a hidden
//! component itself: `.github/*.md` finds `.github/notes.md`, while `**/*.md`
//! never reaches into `.git/`. A pattern that matches nothing is fine.

use crate::config::{PatternSpec, SiteConfig};
use globset::GlobMatcher;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("content root {path} is not accessible: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("cannot resolve {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whether a document is prose/documentation or a code example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Matched by a `[sources]` pattern.
    Documentation,
    /// Matched by an `[examples]` pattern.
    Example,
}

/// A resolved, classified input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDocument {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// Path relative to the pattern's strip prefix, `/`-separated.
    pub display_path: String,
    pub kind: DocumentKind,
}

/// One compiled pattern with the context it was declared in.
#[derive(Debug)]
struct Input {
    kind: DocumentKind,
    matcher: GlobMatcher,
    /// Absolute directory stripped from matches for display.
    prefix: PathBuf,
    /// The glob itself names a hidden component.
    reaches_hidden: bool,
}

/// Pattern resolution against a fixed root.
///
/// Construction compiles the matchers and checks the root; each call to
/// [`documents`](Collector::documents) starts a fresh walk.
#[derive(Debug)]
pub struct Collector {
    root: PathBuf,
    inputs: Vec<Input>,
    excluded: Vec<PathBuf>,
    walk_hidden: bool,
}

impl Collector {
    pub fn new(config: &SiteConfig, root: &Path) -> Result<Self, CollectError> {
        let root = root
            .canonicalize()
            .map_err(|source| CollectError::RootInaccessible {
                path: root.to_path_buf(),
                source,
            })?;
        if !root.is_dir() {
            return Err(CollectError::NotADirectory(root));
        }

        let mut inputs = Vec::new();
        for (kind, spec) in [
            (DocumentKind::Documentation, &config.sources),
            (DocumentKind::Example, &config.examples),
        ] {
            push_inputs(&mut inputs, kind, spec, &root);
        }

        let excluded = vec![config.artifact_dir(&root)];
        let walk_hidden = inputs.iter().any(|i| i.reaches_hidden);
        tracing::debug!(
            root = %root.display(),
            patterns = inputs.len(),
            walk_hidden,
            "collector ready"
        );

        Ok(Self {
            root,
            inputs,
            excluded,
            walk_hidden,
        })
    }

    /// Canonical root the patterns are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A lazy pass over the matching documents.
    ///
    /// The iterator stops after the first error.
    pub fn documents(&self) -> Documents<'_> {
        Documents {
            collector: self,
            next_input: 0,
            current: None,
            seen: HashSet::new(),
            done: false,
        }
    }

    /// Run a full pass and collect the documents.
    pub fn collect_all(&self) -> Result<Vec<SourceDocument>, CollectError> {
        self.documents().collect()
    }

    fn walk(&self) -> Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + '_> {
        Box::new(
            WalkDir::new(&self.root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(move |e| e.depth() == 0 || !self.is_skipped(e)),
        )
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let hidden = is_hidden(&entry.file_name().to_string_lossy());
        (hidden && !self.walk_hidden) || self.excluded.iter().any(|x| entry.path() == x)
    }
}

fn push_inputs(inputs: &mut Vec<Input>, kind: DocumentKind, spec: &PatternSpec, root: &Path) {
    let prefix = root.join(&spec.strip_prefix);
    for glob in &spec.patterns {
        inputs.push(Input {
            kind,
            matcher: glob.compile_matcher(),
            prefix: prefix.clone(),
            reaches_hidden: glob.glob().split('/').any(is_hidden),
        });
    }
}

/// Dot-names other than `.` and `..`.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// `/`-separated rendering of a relative path.
fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Iterator returned by [`Collector::documents`].
pub struct Documents<'a> {
    collector: &'a Collector,
    next_input: usize,
    current: Option<(&'a Input, Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>)>,
    seen: HashSet<PathBuf>,
    done: bool,
}

impl<'a> Documents<'a> {
    fn accept(
        &mut self,
        input: &Input,
        entry: DirEntry,
    ) -> Result<Option<SourceDocument>, CollectError> {
        if entry.file_type().is_dir() {
            return Ok(None);
        }
        let Ok(rel) = entry.path().strip_prefix(&self.collector.root) else {
            return Ok(None);
        };
        if !input.reaches_hidden
            && rel
                .components()
                .any(|c| is_hidden(&c.as_os_str().to_string_lossy()))
        {
            return Ok(None);
        }
        if !input.matcher.is_match(slash_path(rel)) || !entry.path().is_file() {
            return Ok(None);
        }

        let resolved = fs::canonicalize(entry.path()).map_err(|source| CollectError::Resolve {
            path: entry.path().to_path_buf(),
            source,
        })?;
        if !self.seen.insert(resolved.clone()) {
            tracing::trace!(path = %rel.display(), "already collected");
            return Ok(None);
        }

        let display = entry.path().strip_prefix(&input.prefix).unwrap_or(rel);
        Ok(Some(SourceDocument {
            path: resolved,
            display_path: slash_path(display),
            kind: input.kind,
        }))
    }
}

impl<'a> Iterator for Documents<'a> {
    type Item = Result<SourceDocument, CollectError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let Some((input, walker)) = self.current.as_mut() else {
                let collector = self.collector;
                let Some(input) = collector.inputs.get(self.next_input) else {
                    self.done = true;
                    return None;
                };
                tracing::trace!(pattern = input.matcher.glob().glob(), "expanding");
                self.next_input += 1;
                self.current = Some((input, collector.walk()));
                continue;
            };
            let input: &'a Input = *input;

            match walker.next() {
                None => self.current = None,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(entry)) => match self.accept(input, entry) {
                    Ok(Some(doc)) => return Some(Ok(doc)),
                    Ok(None) => {}
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}
