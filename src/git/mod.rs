//! Parsers for the plain-text control files under `.git`.
//!
//! Each submodule handles one format: `HEAD`, `packed-refs` + loose refs,
//! `config` remotes, and reflogs. None of them reads objects or pack files.
//! Malformed input is skipped line by line; no parser returns an error.

pub mod config;
pub mod head;
pub mod reflog;
pub mod refs;

pub use config::{RemoteConfig, RemoteInfo, parse_remotes};
pub use head::{Head, parse_head};
pub use reflog::{ReflogEntry, ReflogMap, collect_reflogs, parse_reflog, reflog_source_ref};
pub use refs::{RefTable, SPECIAL_REFS, build_ref_table, parse_packed_refs};

// ─── Object ids ─────────────────────────────────────────────────────

/// Shortest abbreviated object id accepted.
pub const MIN_OID_LEN: usize = 7;
/// Full SHA-1 length in hex characters.
pub const MAX_OID_LEN: usize = 40;

/// Syntactic object id check: 7–40 hex digits, either case.
///
/// Never consults object storage. The all-zero id passes.
#[must_use]
pub fn is_object_id(s: &str) -> bool {
    (MIN_OID_LEN..=MAX_OID_LEN).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validate and lowercase an object id token.
pub(crate) fn canonical_oid(token: &str) -> Option<String> {
    is_object_id(token).then(|| token.to_ascii_lowercase())
}

/// First whitespace-delimited token of `content`, if it is a valid object id.
///
/// Shared by loose refs, special refs, and detached `HEAD`.
pub(crate) fn leading_oid(content: &str) -> Option<String> {
    content.split_whitespace().next().and_then(canonical_oid)
}

// ─── Path normalization ─────────────────────────────────────────────

/// Normalize a path into the canonical `.git`-relative key space.
///
/// Rules, in order:
/// - `\` → `/`
/// - strip one leading `./`
/// - strip all leading `/`
/// - collapse `//` → `/`
/// - strip trailing `/`
/// - strip a leading `.git/`
///
/// Returns `""` when nothing is left.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let rest = unified.strip_prefix("./").unwrap_or(&unified);
    let rest = rest.trim_start_matches('/');

    let mut result = String::with_capacity(rest.len());
    for c in rest.chars() {
        if c == '/' && result.ends_with('/') {
            continue;
        }
        result.push(c);
    }

    if result.ends_with('/') {
        result.pop();
    }

    match result.strip_prefix(".git/") {
        Some(stripped) => stripped.to_string(),
        None => result,
    }
}

// ─── Date display ───────────────────────────────────────────────────

const SECS_PER_DAY: i64 = 86_400;

/// `+hhmm` / `-hhmm` as signed seconds east of UTC. Anything else is 0.
fn tz_offset_secs(tz: &str) -> i64 {
    let Some((sign, digits)) = tz
        .strip_prefix('+')
        .map(|d| (1, d))
        .or_else(|| tz.strip_prefix('-').map(|d| (-1, d)))
    else {
        return 0;
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    let value: i64 = digits.parse().unwrap_or(0);
    sign * ((value / 100) * 3600 + (value % 100) * 60)
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Render epoch seconds as `YYYY-MM-DD HH:MM:SS <tz>` in the offset's local
/// time. An unparseable offset is shown as given and treated as UTC.
#[must_use]
pub fn format_event_date(timestamp: i64, tz: &str) -> String {
    let local = timestamp.saturating_add(tz_offset_secs(tz));
    let (year, month, day) = civil_from_days(local.div_euclid(SECS_PER_DAY));
    let secs = local.rem_euclid(SECS_PER_DAY);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} {}",
        year,
        month,
        day,
        secs / 3600,
        secs % 3600 / 60,
        secs % 60,
        tz
    )
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
