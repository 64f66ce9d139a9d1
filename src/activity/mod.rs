//! Activity derived from reflogs: message classification, the merged event
//! list, event filtering, and aggregate statistics.

pub mod stats;

pub use stats::{RepoStats, author_key, compute_stats};

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::git::{ReflogEntry, ReflogMap};

// ─── Message classification ─────────────────────────────────────────

/// Action words recognized at the start of a reflog message.
pub const ACTION_WORDS: [&str; 8] = [
    "commit", "checkout", "merge", "rebase", "reset", "pull", "fetch", "amend",
];

static ACTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9-]+)\s*:").expect("action prefix pattern is valid"));

/// Classify a reflog message into an action name.
///
/// Total over all inputs: a known action word, `cherry-pick`, the
/// `<token>:` prefix, `other` for any other text, or `unknown` when empty.
/// This is the one classifier for both the histogram and event filtering.
#[must_use]
pub fn classify_message(message: &str) -> Cow<'static, str> {
    let text = message.trim().to_lowercase();

    if let Some(word) = ACTION_WORDS.iter().copied().find(|w| text.starts_with(w)) {
        return Cow::Borrowed(word);
    }
    if text.starts_with("cherry-pick") || text.starts_with("cherrypick") {
        return Cow::Borrowed("cherry-pick");
    }
    if let Some(caps) = ACTION_PREFIX.captures(&text) {
        return Cow::Owned(caps[1].to_string());
    }
    if text.is_empty() {
        Cow::Borrowed("unknown")
    } else {
        Cow::Borrowed("other")
    }
}

// ─── Event list ─────────────────────────────────────────────────────

/// Merge all reflogs into one duplicate-free, newest-first event list.
///
/// Refs are visited in key order, entries in file order. An entry repeating
/// the `(new id, timestamp, email, message)` of an earlier one is dropped.
/// Equal timestamps keep that visiting order (stable sort).
///
/// The key ignores `old_id` and `source_ref`, so two events differing only
/// in their previous id collapse into one.
pub fn build_event_list(reflogs: &ReflogMap) -> Vec<ReflogEntry> {
    let mut seen: HashSet<(&str, i64, &str, &str)> = HashSet::new();
    let mut events: Vec<ReflogEntry> = Vec::new();

    for entry in reflogs.values().flatten() {
        let key = (
            entry.new_id.as_str(),
            entry.timestamp_ms,
            entry.author_email.as_str(),
            entry.message.as_str(),
        );
        if seen.insert(key) {
            events.push(entry.clone());
        }
    }

    events.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    events
}

// ─── Filtering ──────────────────────────────────────────────────────

/// Predicate over events, used by consumers that list or search activity.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Action as returned by [`classify_message`].
    pub action: Option<String>,
    /// Case-insensitive substring of author name or email.
    pub author: Option<String>,
    /// Exact source ref.
    pub source_ref: Option<String>,
    /// Inclusive lower bound, epoch ms.
    pub since_ms: Option<i64>,
    /// Inclusive upper bound, epoch ms.
    pub until_ms: Option<i64>,
    /// Maximum number of results (0 = unlimited).
    pub limit: usize,
}

impl EventFilter {
    pub fn matches(&self, event: &ReflogEntry) -> bool {
        if let Some(ref action) = self.action {
            if classify_message(&event.message) != action.to_lowercase().as_str() {
                return false;
            }
        }
        if let Some(ref author) = self.author {
            let needle = author.to_lowercase();
            if !event.author_name.to_lowercase().contains(&needle)
                && !event.author_email.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(ref source_ref) = self.source_ref {
            if &event.source_ref != source_ref {
                return false;
            }
        }
        if self.since_ms.is_some_and(|since| event.timestamp_ms < since) {
            return false;
        }
        if self.until_ms.is_some_and(|until| event.timestamp_ms > until) {
            return false;
        }
        true
    }
}

/// Apply `filter` to `events`, preserving order.
pub fn filter_events<'a>(events: &'a [ReflogEntry], filter: &EventFilter) -> Vec<&'a ReflogEntry> {
    let matching = events.iter().filter(|event| filter.matches(event));
    if filter.limit == 0 {
        matching.collect()
    } else {
        matching.take(filter.limit).collect()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
