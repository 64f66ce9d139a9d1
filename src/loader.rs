//! Filesystem loader: collects the control files of a `.git` directory into a
//! [`ByteIndex`].
//!
//! Only paths are collected here. Entries are [`FileBytes::Disk`], so bytes
//! are read during analysis and a read failure there is an analysis failure.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::byte_index::{ByteIndex, FileBytes};
use crate::error::SnapshotError;
use crate::git::{SPECIAL_REFS, normalize_path};

/// Top-level directories never descended into (object storage and friends).
const PRUNED_DIRS: [&str; 4] = ["objects", "hooks", "info", "lfs"];

/// Caps applied while collecting files.
#[derive(Clone, Debug)]
pub struct LoadLimits {
    pub max_files: usize,
    pub max_bytes: u64,
    /// Fail instead of truncating when a cap is hit.
    pub strict: bool,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_files: 20_000,
            max_bytes: 256 * 1024 * 1024,
            strict: false,
        }
    }
}

/// True for the control files the analyzer reads.
#[must_use]
pub fn is_control_path(path: &str) -> bool {
    matches!(path, "HEAD" | "packed-refs" | "config")
        || SPECIAL_REFS.contains(&path)
        || path.starts_with("refs/")
        || path.starts_with("logs/")
}

/// Locate the control directory for `path`.
///
/// Accepts a working tree (with `.git` as a directory, or as a `gitdir:`
/// pointer file) or the control directory itself.
pub fn resolve_git_dir(path: &Path) -> Result<PathBuf, SnapshotError> {
    let dot_git = path.join(".git");
    if dot_git.is_dir() {
        return Ok(dot_git);
    }
    if dot_git.is_file() {
        let pointer = fs::read_to_string(&dot_git)?;
        if let Some(target) = pointer.trim().strip_prefix("gitdir:") {
            let target = path.join(target.trim());
            if target.join("HEAD").is_file() {
                return Ok(target);
            }
        }
    }
    if path.join("HEAD").is_file() {
        return Ok(path.to_path_buf());
    }
    Err(SnapshotError::GitDirNotFound(path.display().to_string()))
}

/// Walk the control directory of `path` and index its control files.
///
/// Files are visited in sorted order. With non-strict limits the walk stops
/// at the first file that would exceed a cap.
pub fn load_git_dir(path: &Path, limits: &LoadLimits) -> Result<ByteIndex, SnapshotError> {
    let git_dir = resolve_git_dir(path)?;
    debug!(git_dir = %git_dir.display(), "Loading control files");

    let mut builder = WalkBuilder::new(&git_dir);
    builder.standard_filters(false);
    builder.hidden(false);
    builder.sort_by_file_name(|a, b| a.cmp(b));
    builder.filter_entry(|entry| {
        let pruned = entry.depth() == 1
            && entry.file_type().is_some_and(|t| t.is_dir())
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| PRUNED_DIRS.contains(&name));
        !pruned
    });

    let mut index = ByteIndex::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&git_dir) else {
            continue;
        };
        let key = normalize_path(&relative.to_string_lossy());
        if !is_control_path(&key) {
            continue;
        }
        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                debug!(path = %key, error = %e, "Skipping file without metadata");
                continue;
            }
        };

        if index.len() >= limits.max_files {
            if limits.strict {
                return Err(SnapshotError::LimitExceeded {
                    kind: "files",
                    limit: limits.max_files as u64,
                });
            }
            warn!(limit = limits.max_files, "File cap reached, remaining files skipped");
            break;
        }
        if index.total_bytes().saturating_add(size) > limits.max_bytes {
            if limits.strict {
                return Err(SnapshotError::LimitExceeded {
                    kind: "bytes",
                    limit: limits.max_bytes,
                });
            }
            warn!(limit = limits.max_bytes, "Byte cap reached, remaining files skipped");
            break;
        }

        if index.insert(&key, FileBytes::Disk(entry.into_path()), size) {
            index.add_total_bytes(size);
        }
    }

    debug!(files = index.len(), bytes = index.total_bytes(), "Control files collected");
    Ok(index)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
