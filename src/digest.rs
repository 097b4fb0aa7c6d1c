//! Content digests for generated artifacts.
//!
//! After the generate stage the artifact tree is hashed so a run can show
//! whether its output changed. The digest is **content-addressed**: it covers
//! every regular file's relative path and bytes, walked in file-name order, and
//! ignores modification times. Re-running the generator over unchanged inputs
//! therefore reproduces the same digest, which is what makes retrying a failed
//! deploy safe to reason about.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Number of hex characters shown in human-facing output.
const SHORT_LEN: usize = 12;

/// SHA-256 over the relative paths and contents of every file under `root`.
pub fn digest_tree(root: &Path) -> io::Result<String> {
    let mut hasher = Sha256::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let bytes = fs::read(entry.path())?;

        hasher.update(rel.to_string_lossy().replace('\\', "/").as_bytes());
        hasher.update(b"\0");
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Leading characters of a digest, for display.
pub fn short(digest: &str) -> &str {
    digest.get(..SHORT_LEN).unwrap_or(digest)
}
