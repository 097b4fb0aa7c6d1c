//! # docpub
//!
//! Publishes a repository's documentation site from CI. A `docpub.toml` at the
//! repository root describes the site, which files feed it, and how to build
//! and deploy it; the actual HTML is produced by an external documentation
//! generator and pushed by an external publish tool.
//!
//! # Architecture: Load, Collect, Publish
//!
//! ```text
//! 1. Config    docpub.toml  →  SiteConfig          (validated, immutable)
//! 2. Collect   repository   →  [SourceDocument]    (ordered, deduplicated)
//! 3. Publish   documents    →  html/ → gh-pages    (generate, then deploy)
//! ```
//!
//! Publishing is itself two stages. `generate` runs on every build so pull
//! requests and feature branches still prove the docs build. `deploy` runs only
//! when the build's branch is the configured trigger branch, and never after a
//! failed `generate`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `docpub.toml` loading and validation; the code-block symbol table |
//! | [`collect`] | Resolves source and example glob patterns into ordered documents |
//! | [`publish`] | Stage orchestration, the generator/deployer seams, and their command-backed implementations |
//! | [`digest`] | Content digest of the generated artifact tree |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## External Collaborators Behind Traits
//!
//! The orchestrator knows nothing about poxy, Doxygen, or `ghp-import`. It
//! drives a [`publish::Generator`] and a [`publish::Deployer`]; the defaults
//! shell out to whatever `[generator]` and `[publish]` name. Tests swap in
//! recording stubs and never spawn a process.
//!
//! ## Manifest Between Stages
//!
//! The generator receives one JSON file (`.docpub/manifest.json`) holding the
//! site metadata, the code-block table, and the ordered document list. It is
//! human-readable, so a misbehaving build can be debugged by reading what the
//! generator was told.
//!
//! ## Clean, Repeatable Runs
//!
//! `generate` deletes the previous artifact directory first and the collector
//! never walks it, so running the pipeline twice over the same inputs yields the
//! same artifacts. The artifact [`digest`] makes that visible. There is no
//! resume after a failure: re-run the whole pipeline.

pub mod collect;
pub mod config;
pub mod digest;
pub mod output;
pub mod publish;

#[cfg(test)]
pub(crate) mod test_helpers;

use thiserror::Error;

/// Any failure that ends a run, tagged with the stage it came from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("config stage failed: {0}")]
    Config(#[from] config::ConfigError),
    #[error("collect stage failed: {0}")]
    Collect(#[from] collect::CollectError),
    #[error(transparent)]
    Publish(#[from] publish::PublishError),
}

impl Error {
    /// Process exit code: one per stage so CI logs can tell them apart.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Collect(_) => 3,
            Error::Publish(publish::PublishError::GenerationFailed(_)) => 4,
            Error::Publish(publish::PublishError::DeploymentFailed(_)) => 5,
        }
    }
}
