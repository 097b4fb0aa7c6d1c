//! Site configuration module.
//!
//! Handles loading and validating `docpub.toml`, the single configuration file
//! at the repository root. Loading is two-step:
//!
//! 1. The TOML text is deserialized into a raw, all-optional shape. Malformed
//!    syntax or a value of the wrong type is a [`ConfigError::Parse`].
//! 2. The raw shape is validated into a [`SiteConfig`]: required fields present,
//!    enum values recognized, every glob and regex compiled. Any problem is a
//!    [`ConfigError::Validation`].
//!
//! No partial `SiteConfig` is ever returned, and validation never touches the
//! filesystem.
//!
//! ## Configuration Options
//!
//! ```toml
//! name = "devblog"                 # required
//! description = "Notes on C++ and tooling"
//! license = "MIT"
//! author = "..."
//! repository = "someone/devblog"
//! cpp = 17                         # language standard marker
//! generate_tagfile = false
//! show_includes = true
//! theme = "auto"                   # light | dark | auto
//! navigation = "navbar"            # navbar | sidebar | none
//!
//! [warnings]
//! treat_as_errors = false
//!
//! [sources]                        # required
//! patterns = ["*.md"]
//! strip_prefix = "."
//!
//! [examples]
//! patterns = ["examples/**/*.cpp"]
//! strip_prefix = "examples"
//!
//! [code_blocks]
//! types = ['std::[a-z_]+']
//! macros = ['[A-Z_]+']
//! enums = []
//!
//! [generator]
//! command = "poxy"
//! args = []
//! output_dir = "html"
//!
//! [publish]
//! trigger_branch = "main"
//! target_branch = "gh-pages"
//! command = "ghp-import"
//! token_env = "GITHUB_TOKEN"
//! ```
//!
//! Unknown keys are ignored so the same file can carry generator-specific
//! settings this pipeline does not interpret.

use globset::Glob;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the configuration file at the repository root.
pub const CONFIG_FILENAME: &str = "docpub.toml";

const DEFAULT_LANGUAGE_STANDARD: u32 = 17;
const DEFAULT_GENERATOR_COMMAND: &str = "poxy";
const DEFAULT_OUTPUT_DIR: &str = "html";
const DEFAULT_TRIGGER_BRANCH: &str = "main";
const DEFAULT_TARGET_BRANCH: &str = "gh-pages";
const DEFAULT_DEPLOY_COMMAND: &str = "ghp-import";
const DEFAULT_DEPLOY_ARGS: &[&str] = &[
    "--no-jekyll",
    "--push",
    "--force",
    "--branch",
    "{target}",
    "{artifacts}",
];
const DEFAULT_COMMIT_NAME: &str = "docpub";
const DEFAULT_COMMIT_EMAIL: &str = "docpub@users.noreply.github.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated site configuration.
///
/// Loaded once at process start and passed by reference to the collector and
/// the orchestrator. Two loads of the same file compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
    pub license: String,
    pub author: String,
    /// Repository identifier, e.g. `someone/devblog`.
    pub repository: String,
    pub language_standard: LanguageStandard,
    pub features: FeatureFlags,
    pub theme: Theme,
    pub navigation: NavigationMode,
    pub warnings: WarningsPolicy,
    /// Documentation and prose inputs.
    pub sources: PatternSpec,
    /// Code example inputs.
    pub examples: PatternSpec,
    pub code_blocks: CodeBlocks,
    pub generator: GeneratorConfig,
    pub publish: PublishConfig,
}

impl SiteConfig {
    /// Directory the generator writes its artifacts to, resolved against `root`.
    pub fn artifact_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.generator.output_dir)
    }
}

/// C++ language standard the documented code targets (`cpp = 17`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LanguageStandard(u32);

impl LanguageStandard {
    const KNOWN: &'static [u32] = &[98, 3, 11, 14, 17, 20, 23, 26];

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for LanguageStandard {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .filter(|v| Self::KNOWN.contains(v))
            .map(LanguageStandard)
            .ok_or_else(|| {
                invalid(format!(
                    "cpp = {value} is not a known language standard (expected one of {:?})",
                    Self::KNOWN
                ))
            })
    }
}

impl Default for LanguageStandard {
    fn default() -> Self {
        LanguageStandard(DEFAULT_LANGUAGE_STANDARD)
    }
}

/// Generator feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub generate_tagfile: bool,
    pub show_includes: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            generate_tagfile: false,
            show_includes: true,
        }
    }
}

/// Color theme of the generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(invalid(format!(
                "theme = \"{other}\" is not recognized (expected light, dark or auto)"
            ))),
        }
    }
}

/// How the generated site presents navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    #[default]
    Navbar,
    Sidebar,
    None,
}

impl FromStr for NavigationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navbar" => Ok(NavigationMode::Navbar),
            "sidebar" => Ok(NavigationMode::Sidebar),
            "none" => Ok(NavigationMode::None),
            other => Err(invalid(format!(
                "navigation = \"{other}\" is not recognized (expected navbar, sidebar or none)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WarningsPolicy {
    pub treat_as_errors: bool,
}

/// A set of file globs plus the prefix stripped from matches for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    /// Compiled globs in declaration order.
    pub patterns: Vec<Glob>,
    /// Relative to the repository root; `.` means the root itself.
    pub strip_prefix: PathBuf,
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            strip_prefix: PathBuf::from("."),
        }
    }
}

/// Symbol category a code-block pattern assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeBlockCategory {
    Types,
    Macros,
    Enums,
}

impl CodeBlockCategory {
    /// All categories, in classification priority order.
    pub const ALL: [CodeBlockCategory; 3] = [
        CodeBlockCategory::Types,
        CodeBlockCategory::Macros,
        CodeBlockCategory::Enums,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CodeBlockCategory::Types => "types",
            CodeBlockCategory::Macros => "macros",
            CodeBlockCategory::Enums => "enums",
        }
    }
}

impl fmt::Display for CodeBlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Compiled symbol-name regexes for one category.
///
/// Every pattern is anchored: it must match the whole symbol.
#[derive(Debug, Clone)]
pub struct SymbolPatterns {
    patterns: Vec<String>,
    set: RegexSet,
}

impl SymbolPatterns {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let set = RegexSet::new(patterns.iter().map(|p| anchored(p)))?;
        Ok(Self { patterns, set })
    }

    /// The patterns as written in the config.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_match(&self, symbol: &str) -> bool {
        self.set.is_match(symbol)
    }
}

impl PartialEq for SymbolPatterns {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

impl Eq for SymbolPatterns {}

impl Default for SymbolPatterns {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }
}

fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// Code-block classification table: category → compiled patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlocks {
    table: BTreeMap<CodeBlockCategory, SymbolPatterns>,
}

impl CodeBlocks {
    pub fn get(&self, category: CodeBlockCategory) -> &SymbolPatterns {
        // Every category is inserted on construction.
        &self.table[&category]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CodeBlockCategory, &SymbolPatterns)> {
        self.table.iter().map(|(c, p)| (*c, p))
    }

    /// Classify a symbol name. Types win over macros, macros over enums.
    pub fn classify(&self, symbol: &str) -> Option<CodeBlockCategory> {
        CodeBlockCategory::ALL
            .into_iter()
            .find(|c| self.get(*c).is_match(symbol))
    }
}

impl Default for CodeBlocks {
    fn default() -> Self {
        Self {
            table: CodeBlockCategory::ALL
                .into_iter()
                .map(|c| (c, SymbolPatterns::default()))
                .collect(),
        }
    }
}

/// External documentation generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub command: String,
    /// Arguments; `{manifest}`, `{output}` and `{root}` are substituted.
    pub args: Vec<String>,
    /// Artifact directory, relative to the repository root.
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_GENERATOR_COMMAND.to_string(),
            args: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Deploy trigger and external publish tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Branch whose builds are deployed.
    pub trigger_branch: String,
    /// Branch (or location) the deploy tool publishes to.
    pub target_branch: String,
    pub command: String,
    /// Arguments; `{artifacts}`, `{target}`, `{name}` and `{email}` are substituted.
    pub args: Vec<String>,
    /// Environment variable holding the deploy credential.
    pub token_env: Option<String>,
    pub commit_name: String,
    pub commit_email: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            trigger_branch: DEFAULT_TRIGGER_BRANCH.to_string(),
            target_branch: DEFAULT_TARGET_BRANCH.to_string(),
            command: DEFAULT_DEPLOY_COMMAND.to_string(),
            args: DEFAULT_DEPLOY_ARGS.iter().map(|s| s.to_string()).collect(),
            token_env: None,
            commit_name: DEFAULT_COMMIT_NAME.to_string(),
            commit_email: DEFAULT_COMMIT_EMAIL.to_string(),
        }
    }
}

// =============================================================================
// Raw (unvalidated) shape
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    name: Option<String>,
    description: Option<String>,
    license: Option<String>,
    author: Option<String>,
    repository: Option<String>,
    cpp: Option<i64>,
    generate_tagfile: Option<bool>,
    show_includes: Option<bool>,
    theme: Option<String>,
    navigation: Option<String>,
    warnings: Option<RawWarnings>,
    sources: Option<RawPatternSpec>,
    examples: Option<RawPatternSpec>,
    code_blocks: Option<RawCodeBlocks>,
    generator: Option<RawGenerator>,
    publish: Option<RawPublish>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWarnings {
    treat_as_errors: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPatternSpec {
    patterns: Option<Vec<String>>,
    strip_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCodeBlocks {
    types: Option<Vec<String>>,
    macros: Option<Vec<String>>,
    enums: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGenerator {
    command: Option<String>,
    args: Option<Vec<String>>,
    output_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPublish {
    trigger_branch: Option<String>,
    target_branch: Option<String>,
    command: Option<String>,
    args: Option<Vec<String>>,
    token_env: Option<String>,
    commit_name: Option<String>,
    commit_email: Option<String>,
}

// =============================================================================
// Loading and validation
// =============================================================================

/// Load and validate the config file at `path`.
///
/// Reads exactly one file; everything after that is pure.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| parse_error(content, &e))?;
    validate(raw)
}

/// Flatten a TOML error to one line: position plus the bare message.
fn parse_error(content: &str, err: &toml::de::Error) -> ConfigError {
    let offset = err.span().map_or(0, |span| span.start);
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    ConfigError::Parse {
        line,
        column,
        message: err.message().split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

fn validate(raw: RawConfig) -> Result<SiteConfig, ConfigError> {
    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| invalid("`name` is required and must not be empty"))?;

    let raw_sources = raw
        .sources
        .ok_or_else(|| invalid("`[sources]` section is required"))?;
    if raw_sources.patterns.is_none() {
        return Err(invalid("`sources.patterns` is required"));
    }
    let sources = validate_pattern_spec("sources", raw_sources)?;
    let examples = match raw.examples {
        Some(spec) => validate_pattern_spec("examples", spec)?,
        None => PatternSpec::default(),
    };

    let language_standard = match raw.cpp {
        Some(v) => LanguageStandard::try_from(v)?,
        None => LanguageStandard::default(),
    };

    let theme = match raw.theme {
        Some(t) => t.parse()?,
        None => Theme::default(),
    };
    let navigation = match raw.navigation {
        Some(n) => n.parse()?,
        None => NavigationMode::default(),
    };

    let defaults = FeatureFlags::default();
    let features = FeatureFlags {
        generate_tagfile: raw.generate_tagfile.unwrap_or(defaults.generate_tagfile),
        show_includes: raw.show_includes.unwrap_or(defaults.show_includes),
    };

    let warnings = WarningsPolicy {
        treat_as_errors: raw
            .warnings
            .and_then(|w| w.treat_as_errors)
            .unwrap_or(false),
    };

    let generator = validate_generator(raw.generator.unwrap_or_default())?;
    check_output_dir_disjoint(
        &generator.output_dir,
        &[("sources", &sources), ("examples", &examples)],
    )?;

    Ok(SiteConfig {
        name,
        description: raw.description.unwrap_or_default(),
        license: raw.license.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        repository: raw.repository.unwrap_or_default(),
        language_standard,
        features,
        theme,
        navigation,
        warnings,
        sources,
        examples,
        code_blocks: validate_code_blocks(raw.code_blocks.unwrap_or_default())?,
        generator,
        publish: validate_publish(raw.publish.unwrap_or_default())?,
    })
}

fn validate_pattern_spec(section: &str, raw: RawPatternSpec) -> Result<PatternSpec, ConfigError> {
    let mut patterns = Vec::new();
    for (i, p) in raw.patterns.unwrap_or_default().iter().enumerate() {
        if p.trim().is_empty() {
            return Err(invalid(format!("{section}.patterns[{i}] must not be empty")));
        }
        let glob = Glob::new(p).map_err(|e| {
            invalid(format!(
                "{section}.patterns[{i}] `{p}` is not a valid glob: {e}"
            ))
        })?;
        patterns.push(glob);
    }

    let strip_prefix = PathBuf::from(raw.strip_prefix.as_deref().unwrap_or("."));
    if !is_contained_relative(&strip_prefix) {
        return Err(invalid(format!(
            "{section}.strip_prefix `{}` must be a relative path inside the repository",
            strip_prefix.display()
        )));
    }

    Ok(PatternSpec {
        patterns,
        strip_prefix,
    })
}

fn validate_code_blocks(raw: RawCodeBlocks) -> Result<CodeBlocks, ConfigError> {
    let mut table = BTreeMap::new();
    for category in CodeBlockCategory::ALL {
        let patterns = match category {
            CodeBlockCategory::Types => raw.types.as_deref(),
            CodeBlockCategory::Macros => raw.macros.as_deref(),
            CodeBlockCategory::Enums => raw.enums.as_deref(),
        }
        .unwrap_or_default();

        // Compile one by one first so the error names the offending entry.
        for (i, p) in patterns.iter().enumerate() {
            Regex::new(&anchored(p)).map_err(|e| {
                invalid(format!(
                    "code_blocks.{category}[{i}] `{p}` is not a valid regex: {e}"
                ))
            })?;
        }
        let compiled = SymbolPatterns::new(patterns.iter().cloned())
            .map_err(|e| invalid(format!("code_blocks.{category}: {e}")))?;
        table.insert(category, compiled);
    }
    Ok(CodeBlocks { table })
}

fn validate_generator(raw: RawGenerator) -> Result<GeneratorConfig, ConfigError> {
    let defaults = GeneratorConfig::default();
    let command = raw.command.unwrap_or(defaults.command);
    if command.trim().is_empty() {
        return Err(invalid("generator.command must not be empty"));
    }

    let output_dir = raw
        .output_dir
        .map(PathBuf::from)
        .unwrap_or(defaults.output_dir);
    let has_normal = output_dir
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if !has_normal || !is_contained_relative(&output_dir) {
        return Err(invalid(format!(
            "generator.output_dir `{}` must be a subdirectory of the repository",
            output_dir.display()
        )));
    }

    Ok(GeneratorConfig {
        command,
        args: raw.args.unwrap_or(defaults.args),
        output_dir,
    })
}

/// The generate stage deletes `output_dir` before each run, so it must not
/// hold any declared input: neither a `strip_prefix` nor the fixed leading
/// directories of a pattern may lie inside it.
fn check_output_dir_disjoint(
    output_dir: &Path,
    specs: &[(&str, &PatternSpec)],
) -> Result<(), ConfigError> {
    let output_dir = normalized(output_dir);
    for (section, spec) in specs {
        let prefix = normalized(&spec.strip_prefix);
        if prefix.starts_with(&output_dir) {
            return Err(invalid(format!(
                "generator.output_dir `{}` would delete {section}.strip_prefix `{}`",
                output_dir.display(),
                spec.strip_prefix.display()
            )));
        }
        for glob in &spec.patterns {
            if literal_base(glob.glob()).starts_with(&output_dir) {
                return Err(invalid(format!(
                    "generator.output_dir `{}` would delete files matched by {section} pattern `{}`",
                    output_dir.display(),
                    glob.glob()
                )));
            }
        }
    }
    Ok(())
}

/// Leading path components of a glob that contain no wildcard.
fn literal_base(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|part| !part.contains(['*', '?', '[', '{', '\\']))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn validate_publish(raw: RawPublish) -> Result<PublishConfig, ConfigError> {
    let defaults = PublishConfig::default();
    let config = PublishConfig {
        trigger_branch: raw.trigger_branch.unwrap_or(defaults.trigger_branch),
        target_branch: raw.target_branch.unwrap_or(defaults.target_branch),
        command: raw.command.unwrap_or(defaults.command),
        args: raw.args.unwrap_or(defaults.args),
        token_env: raw.token_env.filter(|t| !t.trim().is_empty()),
        commit_name: raw.commit_name.unwrap_or(defaults.commit_name),
        commit_email: raw.commit_email.unwrap_or(defaults.commit_email),
    };

    for (key, value) in [
        ("publish.trigger_branch", &config.trigger_branch),
        ("publish.target_branch", &config.target_branch),
        ("publish.command", &config.command),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("{key} must not be empty")));
        }
    }
    Ok(config)
}

/// Relative, and never climbs above its starting point.
fn is_contained_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Returns a fully-commented sample `docpub.toml` that loads successfully.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# docpub configuration
# ====================
# Only `name` and `[sources].patterns` are required. Values shown for
# optional keys are the defaults. Keys docpub does not know are ignored,
# so generator-specific settings can live in this file too.

name = "devblog"
description = ""
license = ""
author = ""
repository = ""

# C++ standard the documented code targets: 98, 3, 11, 14, 17, 20, 23 or 26.
cpp = 17

generate_tagfile = false
show_includes = true

# light | dark | auto
theme = "auto"

# navbar | sidebar | none
navigation = "navbar"

[warnings]
treat_as_errors = false

# ---------------------------------------------------------------------------
# Inputs
# ---------------------------------------------------------------------------
# Globs are matched against paths relative to the repository root, in the
# order written. `*` also crosses directories, so "*.md" finds docs/post.md.
# A file matched by several patterns is collected once, at its first match.
# Hidden files and directories (".github/") are only collected by a pattern
# that names them, e.g. ".github/*.md"; "**/*.md" never reaches into them.
[sources]
patterns = ["*.md"]
strip_prefix = "."

[examples]
patterns = []
strip_prefix = "."

# ---------------------------------------------------------------------------
# Code block symbol classification (regular expressions, whole-name match)
# ---------------------------------------------------------------------------
[code_blocks]
types = []
macros = []
enums = []

# ---------------------------------------------------------------------------
# Generate stage
# ---------------------------------------------------------------------------
# Placeholders in args: {manifest} {output} {root}
# output_dir is deleted and recreated on every run. It must not contain any
# [sources] or [examples] location.
[generator]
command = "poxy"
args = []
output_dir = "html"

# ---------------------------------------------------------------------------
# Deploy stage
# ---------------------------------------------------------------------------
# Runs only when the build branch equals trigger_branch.
# Placeholders in args: {artifacts} {target} {name} {email}
[publish]
trigger_branch = "main"
target_branch = "gh-pages"
command = "ghp-import"
args = ["--no-jekyll", "--push", "--force", "--branch", "{target}", "{artifacts}"]
# token_env = "GITHUB_TOKEN"
commit_name = "docpub"
commit_email = "docpub@users.noreply.github.com"
"#
}
