//! Reflog parsing for `logs/HEAD` and `logs/refs/**`.
//!
//! Line format (as written by git):
//!
//! ```text
//! <old-id> <new-id> <name> <<email>> <epoch-secs> <+hhmm>\t<message>
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::canonical_oid;
use crate::byte_index::ByteIndex;
use crate::error::SnapshotError;

/// One reflog line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflogEntry {
    pub old_id: String,
    pub new_id: String,
    pub author_name: String,
    pub author_email: String,
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
    /// Signed four-digit offset, e.g. `+0200`.
    pub timezone: String,
    pub message: String,
    /// Logical ref the line came from (`HEAD`, `refs/heads/main`, ...).
    pub source_ref: String,
}

/// Source ref → entries in file order.
pub type ReflogMap = BTreeMap<String, Vec<ReflogEntry>>;

// The name is matched lazily so it stops at the first `<email>` token. A
// non-empty name must be separated from it by whitespace. Digits are ASCII.
static REFLOG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<old>\S+)\s+(?P<new>\S+)\s+(?:(?P<name>.*?)\s+)?<(?P<email>[^>]*)>\s+(?P<ts>[0-9]+)\s+(?P<tz>[+-][0-9]{4})$",
    )
    .expect("reflog prefix pattern is valid")
});

/// Map a reflog path to the ref it logs.
///
/// `logs/HEAD` → `HEAD`, `logs/refs/heads/main` → `refs/heads/main`.
/// Anything else is not a reflog.
pub fn reflog_source_ref(path: &str) -> Option<&str> {
    match path {
        "logs/HEAD" => Some("HEAD"),
        _ => path
            .strip_prefix("logs/")
            .filter(|rest| rest.starts_with("refs/")),
    }
}

/// Parse one reflog file, keeping at most `cap` entries.
///
/// Lines that do not have the reflog shape, carry an invalid id, or have a
/// non-positive timestamp are skipped.
pub fn parse_reflog(content: &str, source_ref: &str, cap: usize) -> Vec<ReflogEntry> {
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for line in content.lines() {
        if entries.len() >= cap {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, source_ref) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(source_ref, skipped, "reflog: skipped malformed lines");
    }
    entries
}

fn parse_line(line: &str, source_ref: &str) -> Option<ReflogEntry> {
    let (prefix, message) = line.split_once('\t').unwrap_or((line, ""));
    let caps = REFLOG_PREFIX.captures(prefix.trim())?;

    let old_id = canonical_oid(&caps["old"])?;
    let new_id = canonical_oid(&caps["new"])?;
    let seconds: i64 = caps["ts"].parse().ok().filter(|&s| s > 0)?;
    let timestamp_ms = seconds.checked_mul(1000)?;

    Some(ReflogEntry {
        old_id,
        new_id,
        author_name: caps.name("name").map_or("", |m| m.as_str().trim()).to_string(),
        author_email: caps["email"].trim().to_string(),
        timestamp_ms,
        timezone: caps["tz"].to_string(),
        message: message.trim().to_string(),
        source_ref: source_ref.to_string(),
    })
}

/// Parse `logs/HEAD` and every `logs/refs/**` file of the index.
///
/// `cap` applies per file, not across files.
pub fn collect_reflogs(index: &ByteIndex, cap: usize) -> Result<ReflogMap, SnapshotError> {
    let mut map = ReflogMap::new();

    let head = index.get("logs/HEAD").map(|entry| ("logs/HEAD", entry));
    for (path, entry) in head.into_iter().chain(index.with_prefix("logs/refs/")) {
        let Some(source_ref) = reflog_source_ref(path) else {
            continue;
        };
        let text = entry.text(path)?;
        let entries = parse_reflog(&text, source_ref, cap);
        debug!(source_ref, count = entries.len(), "reflog parsed");
        map.insert(source_ref.to_string(), entries);
    }

    Ok(map)
}
