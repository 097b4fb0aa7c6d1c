//! Generator manifest.
//!
//! The generate stage hands the external generator a single JSON file
//! describing the site and the ordered document list. Serialization is
//! deterministic: the same config and documents always produce the same bytes.
//!
//! ```json
//! {
//!   "version": 1,
//!   "site": { "name": "devblog", "cpp": 17, "theme": "auto", ... },
//!   "output_dir": "/repo/html",
//!   "code_blocks": { "types": ["std::[a-z_]+"], "macros": [], "enums": [] },
//!   "documents": [
//!     { "path": "/repo/index.md", "display_path": "index.md", "kind": "documentation" }
//!   ]
//! }
//! ```

use crate::collect::SourceDocument;
use crate::config::{
    CodeBlockCategory, FeatureFlags, LanguageStandard, NavigationMode, SiteConfig, Theme,
    WarningsPolicy,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the manifest inside the work directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Bump when the manifest layout changes.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct GeneratorManifest<'a> {
    pub version: u32,
    pub site: SiteMeta<'a>,
    pub output_dir: &'a Path,
    pub code_blocks: BTreeMap<CodeBlockCategory, &'a [String]>,
    pub documents: &'a [SourceDocument],
}

#[derive(Debug, Serialize)]
pub struct SiteMeta<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub license: &'a str,
    pub author: &'a str,
    pub repository: &'a str,
    pub cpp: LanguageStandard,
    #[serde(flatten)]
    pub features: FeatureFlags,
    pub theme: Theme,
    pub navigation: NavigationMode,
    pub warnings: WarningsPolicy,
}

impl<'a> GeneratorManifest<'a> {
    pub fn new(
        config: &'a SiteConfig,
        documents: &'a [SourceDocument],
        output_dir: &'a Path,
    ) -> Self {
        Self {
            version: MANIFEST_VERSION,
            site: SiteMeta {
                name: &config.name,
                description: &config.description,
                license: &config.license,
                author: &config.author,
                repository: &config.repository,
                cpp: config.language_standard,
                features: config.features,
                theme: config.theme,
                navigation: config.navigation,
                warnings: config.warnings,
            },
            output_dir,
            code_blocks: config
                .code_blocks
                .iter()
                .map(|(category, patterns)| (category, patterns.patterns()))
                .collect(),
            documents,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
