//! Collaborator traits and shared types.
//!
//! The orchestrator never runs tools itself: it talks to a [`Generator`] and a
//! [`Deployer`]. The production implementations live in
//! [`command`](super::command) and shell out to configured programs; tests
//! substitute recording stubs.

use crate::collect::SourceDocument;
use crate::config::{PublishConfig, SiteConfig};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with status {code}")]
    ExitStatus { command: String, code: i32 },
    #[error("`{command}` was interrupted")]
    Interrupted { command: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Failed(String),
}

/// External documentation generator.
pub trait Generator {
    /// Build artifacts from the collected documents.
    ///
    /// Returns the artifact directory on success.
    fn generate(
        &self,
        documents: &[SourceDocument],
        config: &SiteConfig,
    ) -> Result<PathBuf, CollaboratorError>;
}

/// External publish tool.
pub trait Deployer {
    /// Publish the artifact directory to the target, overwriting what is there.
    fn deploy(&self, artifacts: &Path, target: &DeployTarget) -> Result<(), CollaboratorError>;
}

/// Author recorded on the published commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Where and as whom the deploy stage publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub branch: String,
    pub identity: CommitIdentity,
}

impl DeployTarget {
    pub fn from_config(publish: &PublishConfig) -> Self {
        Self {
            branch: publish.target_branch.clone(),
            identity: CommitIdentity {
                name: publish.commit_name.clone(),
                email: publish.commit_email.clone(),
            },
        }
    }
}

/// A credential that never prints its value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// The raw value, for handing to a child process only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
