//! Byte index: canonical `.git`-relative path → file content.
//!
//! The analyzer never touches the filesystem directly. It consumes a
//! finished [`ByteIndex`], produced either in memory (tests, embedders) or by
//! [`crate::loader::load_git_dir`], whose entries point at files on disk and
//! are read lazily during analysis.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::PathBuf;

use crate::error::SnapshotError;
use crate::git::normalize_path;

/// Where a file's bytes come from.
#[derive(Clone, Debug)]
pub enum FileBytes {
    /// Content already resident in memory.
    Memory(Vec<u8>),
    /// Content read from disk on first access.
    Disk(PathBuf),
}

impl FileBytes {
    /// Borrow or read the raw bytes.
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            FileBytes::Memory(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            FileBytes::Disk(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}

/// One file of the index.
#[derive(Clone, Debug)]
pub struct FileEntry {
    pub bytes: FileBytes,
    /// Size in bytes as reported by the producer of the index.
    pub size: u64,
}

impl FileEntry {
    /// Read the file and decode it as text, replacing invalid UTF-8.
    pub fn read_text(&self) -> std::io::Result<String> {
        let raw = self.bytes.read()?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Like [`read_text`](Self::read_text), with a read failure reported as
    /// the analysis-level error for `path`.
    pub fn text(&self, path: &str) -> Result<String, SnapshotError> {
        self.read_text().map_err(|source| SnapshotError::AnalysisFailed {
            path: path.to_string(),
            source,
        })
    }
}

/// Canonical path → file mapping plus the declared total byte count.
///
/// Keys are normalized on insert and kept sorted, so iteration over loose
/// refs and reflogs is deterministic for identical input.
#[derive(Clone, Debug, Default)]
pub struct ByteIndex {
    files: BTreeMap<String, FileEntry>,
    total_bytes: u64,
}

impl ByteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an in-memory index from `(path, content)` pairs.
    /// `total_bytes` is the sum of the content lengths.
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        let mut index = Self::new();
        for (path, content) in files {
            let bytes: Vec<u8> = content.into();
            let size = bytes.len() as u64;
            if index.insert(path.as_ref(), FileBytes::Memory(bytes), size) {
                index.total_bytes += size;
            }
        }
        index
    }

    /// Override the declared total byte count.
    #[must_use]
    pub fn with_total_bytes(mut self, total_bytes: u64) -> Self {
        self.total_bytes = total_bytes;
        self
    }

    /// Insert a file under its normalized path. Returns `false` (and stores
    /// nothing) if the path normalizes to the empty string.
    pub fn insert(&mut self, path: &str, bytes: FileBytes, size: u64) -> bool {
        let key = normalize_path(path);
        if key.is_empty() {
            return false;
        }
        self.files.insert(key, FileEntry { bytes, size });
        true
    }

    /// Add to the declared byte total (used by loaders as they insert).
    pub fn add_total_bytes(&mut self, bytes: u64) {
        self.total_bytes = self.total_bytes.saturating_add(bytes);
    }

    /// Look up a file by path. The query is normalized first.
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.files.get(normalize_path(path).as_str())
    }

    /// Read the text of `path`, or `None` if the index has no such file.
    pub fn read_text(&self, path: &str) -> Result<Option<String>, SnapshotError> {
        self.get(path).map(|entry| entry.text(path)).transpose()
    }

    /// Iterate entries whose canonical path starts with `prefix`, in key order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a FileEntry)> + 'a {
        self.files
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.files.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of files in the index.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Declared total byte count (passed through to stats, never recomputed).
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
