//! Shared test utilities for the docpub test suite.
//!
//! Provides fixture setup, small tree builders, and recording stand-ins for
//! the external generator and deployer.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_config(tmp.path());
//! let docs = Collector::new(&config, tmp.path()).unwrap().collect_all().unwrap();
//!
//! assert_eq!(display_paths(&docs)[0], "index.md");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::collect::{DocumentKind, SourceDocument};
use crate::config::{CONFIG_FILENAME, SiteConfig, load_config};
use crate::publish::{CollaboratorError, DeployTarget, Deployer, Generator};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load `docpub.toml` from a fixture root. Panics on error.
pub fn fixture_config(root: &Path) -> SiteConfig {
    load_config(&root.join(CONFIG_FILENAME)).unwrap()
}

/// Write `(relative path, contents)` pairs under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Display paths in collection order.
pub fn display_paths(docs: &[SourceDocument]) -> Vec<&str> {
    docs.iter().map(|d| d.display_path.as_str()).collect()
}

/// Two documents with fake paths, for tests that never touch them.
pub fn sample_documents() -> Vec<SourceDocument> {
    vec![
        SourceDocument {
            path: PathBuf::from("/repo/index.md"),
            display_path: "index.md".into(),
            kind: DocumentKind::Documentation,
        },
        SourceDocument {
            path: PathBuf::from("/repo/examples/slice.cpp"),
            display_path: "slice.cpp".into(),
            kind: DocumentKind::Example,
        },
    ]
}

// =========================================================================
// Recording collaborators
// =========================================================================

enum Behavior {
    Succeed,
    SucceedEmpty,
    Fail(String),
}

/// Generator that records calls and writes a tiny deterministic site.
pub struct RecordingGenerator {
    root: PathBuf,
    behavior: Behavior,
    documents_seen: Mutex<Vec<usize>>,
}

impl RecordingGenerator {
    /// Writes `<root>/html/index.html` listing the documents.
    pub fn succeeding(root: &Path) -> Self {
        Self::with(root, Behavior::Succeed)
    }

    /// Reports `<root>/html` without creating it.
    pub fn succeeding_without_output(root: &Path) -> Self {
        Self::with(root, Behavior::SucceedEmpty)
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Path::new(""), Behavior::Fail(message.to_string()))
    }

    fn with(root: &Path, behavior: Behavior) -> Self {
        Self {
            root: root.to_path_buf(),
            behavior,
            documents_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.documents_seen.lock().unwrap().len()
    }

    pub fn last_document_count(&self) -> Option<usize> {
        self.documents_seen.lock().unwrap().last().copied()
    }
}

impl Generator for RecordingGenerator {
    fn generate(
        &self,
        documents: &[SourceDocument],
        _config: &SiteConfig,
    ) -> Result<PathBuf, CollaboratorError> {
        self.documents_seen.lock().unwrap().push(documents.len());

        let out = self.root.join("html");
        match &self.behavior {
            Behavior::Fail(message) => Err(CollaboratorError::Failed(message.clone())),
            Behavior::SucceedEmpty => Ok(out),
            Behavior::Succeed => {
                let listing: Vec<&str> = documents.iter().map(|d| d.display_path.as_str()).collect();
                write_tree(&out, &[("index.html", &listing.join("\n"))]);
                Ok(out)
            }
        }
    }
}

/// Deployer that records each artifact directory and target it is given.
#[derive(Default)]
pub struct RecordingDeployer {
    failure: Option<String>,
    deployments: Mutex<Vec<(PathBuf, DeployTarget)>>,
}

impl RecordingDeployer {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.deployments.lock().unwrap().len()
    }

    pub fn last_artifacts(&self) -> Option<PathBuf> {
        self.deployments.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    pub fn last_target(&self) -> Option<DeployTarget> {
        self.deployments.lock().unwrap().last().map(|(_, t)| t.clone())
    }
}

impl Deployer for RecordingDeployer {
    fn deploy(&self, artifacts: &Path, target: &DeployTarget) -> Result<(), CollaboratorError> {
        self.deployments
            .lock()
            .unwrap()
            .push((artifacts.to_path_buf(), target.clone()));
        match &self.failure {
            Some(message) => Err(CollaboratorError::Failed(message.clone())),
            None => Ok(()),
        }
    }
}
