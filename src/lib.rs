//! # gitscope: `.git` control-file snapshot analyzer
//!
//! Turns the plain-text control files of a `.git` directory (`HEAD`, refs,
//! `packed-refs`, `config`, reflogs) into one [`Snapshot`]: the current head,
//! the ref table, configured remotes, a deduplicated newest-first activity
//! list, and statistics over it.
//!
//! ## Library usage
//!
//! The analyzer works on a finished [`ByteIndex`] and never reads objects or
//! pack files. Build the index in memory or with [`load_git_dir`]:
//!
//! ```
//! use gitscope::{analyze, AnalyzeOptions, ByteIndex, Head, RepoIdentity, SourceKind};
//!
//! let index = ByteIndex::from_files([
//!     ("HEAD", "ref: refs/heads/main\n"),
//!     ("refs/heads/main", "abc1234\n"),
//! ]);
//! let identity = RepoIdentity::new("demo", SourceKind::Memory, 0);
//! let snapshot = analyze(&index, identity, &AnalyzeOptions::default()).unwrap();
//!
//! assert_eq!(snapshot.head, Some(Head::Symbolic { target: "refs/heads/main".into() }));
//! assert_eq!(snapshot.stats.branches, 1);
//! ```

pub mod activity;
pub mod byte_index;
pub mod error;
pub mod git;
pub mod loader;
pub mod snapshot;

pub use activity::{
    EventFilter, RepoStats, author_key, build_event_list, classify_message, compute_stats,
    filter_events,
};
pub use byte_index::{ByteIndex, FileBytes, FileEntry};
pub use error::SnapshotError;
pub use git::{
    Head, RefTable, ReflogEntry, ReflogMap, RemoteConfig, RemoteInfo, format_event_date,
    is_object_id, normalize_path,
};
pub use loader::{LoadLimits, load_git_dir};
pub use snapshot::{
    AnalyzeOptions, DEFAULT_REFLOG_CAP, MAX_REFLOG_CAP, MIN_REFLOG_CAP, RepoIdentity, Snapshot,
    SourceKind, analyze,
};

// ─── Property-based tests (proptest) ─────────────────────────────────
