//! Top-level analysis: byte index → [`Snapshot`].
//!
//! One call, one immutable result. Runs share no state, and a run that is
//! dropped part-way leaves nothing behind.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::activity::{RepoStats, build_event_list, compute_stats};
use crate::byte_index::ByteIndex;
use crate::error::SnapshotError;
use crate::git::{
    Head, RefTable, ReflogEntry, RemoteConfig, build_ref_table, collect_reflogs, parse_head,
    parse_remotes,
};

// ─── Options ────────────────────────────────────────────────────────

/// Default per-log reflog entry cap.
pub const DEFAULT_REFLOG_CAP: usize = 10_000;
/// Lower clamp for the reflog entry cap.
pub const MIN_REFLOG_CAP: usize = 100;
/// Upper clamp for the reflog entry cap.
pub const MAX_REFLOG_CAP: usize = 200_000;

/// Analysis options.
#[derive(Clone, Debug)]
pub struct AnalyzeOptions {
    /// Keep the verbatim `config` text in the snapshot.
    pub include_raw_config: bool,
    /// Entries kept per reflog file. Clamped by [`effective_reflog_cap`](Self::effective_reflog_cap).
    pub max_reflog_entries_per_ref: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            include_raw_config: false,
            max_reflog_entries_per_ref: DEFAULT_REFLOG_CAP,
        }
    }
}

impl AnalyzeOptions {
    pub fn effective_reflog_cap(&self) -> usize {
        self.max_reflog_entries_per_ref.clamp(MIN_REFLOG_CAP, MAX_REFLOG_CAP)
    }
}

// ─── Identity ───────────────────────────────────────────────────────

/// How the byte index was obtained. Opaque to the analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A directory on the local filesystem.
    Directory,
    /// An uploaded or extracted archive.
    Archive,
    /// Files assembled by the caller.
    Memory,
}

/// Caller-supplied identity of the analyzed repository, passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoIdentity {
    pub label: String,
    pub source: SourceKind,
    /// Epoch milliseconds when the byte index was loaded.
    pub loaded_at_ms: i64,
}

impl RepoIdentity {
    pub fn new(label: impl Into<String>, source: SourceKind, loaded_at_ms: i64) -> Self {
        Self {
            label: label.into(),
            source,
            loaded_at_ms,
        }
    }
}

// ─── Snapshot ───────────────────────────────────────────────────────

/// Fully materialized repository state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub identity: RepoIdentity,
    pub head: Option<Head>,
    pub refs: RefTable,
    /// Newest first, deduplicated.
    pub events: Vec<ReflogEntry>,
    pub remote_config: RemoteConfig,
    pub stats: RepoStats,
}

/// Analyze a byte index.
///
/// Absent files produce empty fields. The only error is
/// [`SnapshotError::AnalysisFailed`], raised when a file's bytes cannot be
/// read; no partial snapshot is returned in that case.
pub fn analyze(
    index: &ByteIndex,
    identity: RepoIdentity,
    options: &AnalyzeOptions,
) -> Result<Snapshot, SnapshotError> {
    let start = Instant::now();

    let head = index.read_text("HEAD")?.as_deref().and_then(parse_head);
    let refs = build_ref_table(index)?;
    let remote_config = index
        .read_text("config")?
        .map(|text| parse_remotes(&text, options.include_raw_config))
        .unwrap_or_default();
    let reflogs = collect_reflogs(index, options.effective_reflog_cap())?;

    let events = build_event_list(&reflogs);
    let stats = compute_stats(&refs, &events, index.len(), index.total_bytes());

    info!(
        label = %identity.label,
        refs = refs.len(),
        events = events.len(),
        remotes = remote_config.remotes.len(),
        elapsed_ms = format_args!("{:.1}", start.elapsed().as_secs_f64() * 1000.0),
        "Snapshot built"
    );

    Ok(Snapshot {
        identity,
        head,
        refs,
        events,
        remote_config,
        stats,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
