//! Aggregate statistics over the ref table and the event list.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::classify_message;
use crate::git::{RefTable, ReflogEntry};

const MS_PER_DAY: i64 = 86_400_000;

/// Repository-wide counters. Activity fields are `None` when there are no events.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub total_refs: usize,
    pub branches: usize,
    pub tags: usize,
    pub remotes: usize,
    pub events: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_ts: Option<i64>,
    /// Distinct UTC calendar days with at least one event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_days: Option<usize>,
    /// `events / active_days`, rounded to 2 decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_events_per_day: Option<f64>,
    /// `"<name> <<email>>"` → event count.
    pub authors: BTreeMap<String, usize>,
    /// Action (see [`classify_message`]) → event count.
    pub event_types: BTreeMap<String, usize>,
}

/// Histogram key for an author identity: `Name <email>`, or `<email>` alone.
#[must_use]
pub fn author_key(name: &str, email: &str) -> String {
    if name.is_empty() {
        format!("<{}>", email)
    } else {
        format!("{} <{}>", name, email)
    }
}

/// Compute statistics. File and byte totals come from the byte index and
/// are passed in unchanged.
pub fn compute_stats(
    refs: &RefTable,
    events: &[ReflogEntry],
    total_files: usize,
    total_bytes: u64,
) -> RepoStats {
    let mut stats = RepoStats {
        total_files,
        total_bytes,
        total_refs: refs.len(),
        events: events.len(),
        ..RepoStats::default()
    };

    for name in refs.keys() {
        if name.starts_with("refs/heads/") {
            stats.branches += 1;
        } else if name.starts_with("refs/tags/") {
            stats.tags += 1;
        } else if name.starts_with("refs/remotes/") {
            stats.remotes += 1;
        }
    }

    let mut days: HashSet<i64> = HashSet::new();
    for event in events {
        let ts = event.timestamp_ms;
        stats.first_activity_ts = Some(stats.first_activity_ts.map_or(ts, |first| first.min(ts)));
        stats.last_activity_ts = Some(stats.last_activity_ts.map_or(ts, |last| last.max(ts)));
        days.insert(ts.div_euclid(MS_PER_DAY));

        *stats
            .authors
            .entry(author_key(&event.author_name, &event.author_email))
            .or_default() += 1;
        *stats
            .event_types
            .entry(classify_message(&event.message).into_owned())
            .or_default() += 1;
    }

    if !events.is_empty() {
        stats.active_days = Some(days.len());
    }
    stats.avg_events_per_day = stats
        .active_days
        .filter(|&d| d > 0)
        .map(|d| round2(events.len() as f64 / d as f64));

    stats
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
