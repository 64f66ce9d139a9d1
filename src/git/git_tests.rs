//! Unit tests for the control-file parsers.
//!
//! All tests use in-memory content; no repository on disk is required.

use super::*;
use crate::byte_index::ByteIndex;

const SHA_A: &str = "1111111111111111111111111111111111111111";
const SHA_B: &str = "2222222222222222222222222222222222222222";
const SHA_C: &str = "3333333333333333333333333333333333333333";

// ─── Object id tests ────────────────────────────────────────────────

#[test]
fn test_is_object_id_lengths() {
    assert!(is_object_id("abc1234"));
    assert!(is_object_id(SHA_A));
    assert!(!is_object_id("abc123"), "6 chars is too short");
    assert!(!is_object_id(&format!("{}0", SHA_A)), "41 chars is too long");
}

#[test]
fn test_is_object_id_case_and_charset() {
    assert!(is_object_id("DEADBEEF"));
    assert!(!is_object_id("deadbeefz"));
    assert!(!is_object_id("ref: refs/heads/main"));
    assert!(!is_object_id(""));
}

#[test]
fn test_zero_id_is_accepted() {
    assert!(is_object_id("0000000000000000000000000000000000000000"));
}

#[test]
fn test_canonical_oid_lowercases() {
    assert_eq!(canonical_oid("ABCDEF1").as_deref(), Some("abcdef1"));
    assert_eq!(canonical_oid("xyz"), None);
}

// ─── normalize_path tests ───────────────────────────────────────────

#[test]
fn test_normalize_backslashes() {
    assert_eq!(normalize_path(r"refs\heads\main"), "refs/heads/main");
}

#[test]
fn test_normalize_leading_dot_slash() {
    assert_eq!(normalize_path("./HEAD"), "HEAD");
}

#[test]
fn test_normalize_strips_only_one_dot_slash() {
    assert_eq!(normalize_path("././HEAD"), "./HEAD");
}

#[test]
fn test_normalize_leading_slashes() {
    assert_eq!(normalize_path("///refs/heads/main"), "refs/heads/main");
}

#[test]
fn test_normalize_collapses_slashes() {
    assert_eq!(normalize_path("refs//heads///main"), "refs/heads/main");
}

#[test]
fn test_normalize_trailing_slash() {
    assert_eq!(normalize_path("refs/heads/"), "refs/heads");
}

#[test]
fn test_normalize_strips_git_prefix() {
    assert_eq!(normalize_path(".git/logs/HEAD"), "logs/HEAD");
    assert_eq!(normalize_path(r".\.git\config"), "config");
    assert_eq!(normalize_path("/.git//packed-refs"), "packed-refs");
}

#[test]
fn test_normalize_bare_git_is_kept() {
    assert_eq!(normalize_path(".git"), ".git");
}

#[test]
fn test_normalize_empty_results() {
    assert_eq!(normalize_path(""), "");
    assert_eq!(normalize_path("/"), "");
    assert_eq!(normalize_path("./"), "");
    assert_eq!(normalize_path(".git/"), ".git");
}

// ─── HEAD tests ─────────────────────────────────────────────────────

#[test]
fn test_head_symbolic() {
    assert_eq!(
        parse_head("ref: refs/heads/main\n"),
        Some(Head::Symbolic { target: "refs/heads/main".to_string() })
    );
}

#[test]
fn test_head_symbolic_case_insensitive_keyword() {
    assert_eq!(
        parse_head("REF:\trefs/heads/dev"),
        Some(Head::Symbolic { target: "refs/heads/dev".to_string() })
    );
}

#[test]
fn test_head_symbolic_requires_whitespace() {
    assert_eq!(parse_head("ref:refs/heads/main"), None);
}

#[test]
fn test_head_symbolic_target_single_line() {
    assert_eq!(parse_head("ref: refs/heads/main\nextra"), None);
}

#[test]
fn test_head_symbolic_target_rejects_carriage_return() {
    assert_eq!(parse_head("ref: refs/heads/a\rb"), None);
    assert_eq!(
        parse_head("ref: refs/heads/main\r\n"),
        Some(Head::Symbolic { target: "refs/heads/main".to_string() })
    );
}

#[test]
fn test_head_detached() {
    let id = "deadbeefcafebabefeed1234567890abcdef1234";
    assert_eq!(
        parse_head(&format!("{}\n", id)),
        Some(Head::Detached { id: id.to_string() })
    );
}

#[test]
fn test_head_detached_uses_first_token() {
    assert_eq!(
        parse_head("ABCDEF0 trailing words"),
        Some(Head::Detached { id: "abcdef0".to_string() })
    );
}

#[test]
fn test_head_empty_or_garbage() {
    assert_eq!(parse_head(""), None);
    assert_eq!(parse_head("   \n"), None);
    assert_eq!(parse_head("not a head file"), None);
    assert_eq!(parse_head("ref:"), None);
}

#[test]
fn test_head_branch_name() {
    let head = Head::Symbolic { target: "refs/heads/feature/x".to_string() };
    assert_eq!(head.branch(), Some("feature/x"));
    let detached = Head::Detached { id: "abc1234".to_string() };
    assert_eq!(detached.branch(), None);
}

// ─── packed-refs tests ──────────────────────────────────────────────

#[test]
fn test_packed_refs_basic() {
    let content = format!(
        "# pack-refs with: peeled fully-peeled sorted \n{} refs/heads/main\n{} refs/tags/v1.0\n^{}\n",
        SHA_A, SHA_B, SHA_C
    );
    let refs = parse_packed_refs(&content);
    assert_eq!(
        refs,
        vec![
            ("refs/heads/main".to_string(), SHA_A.to_string()),
            ("refs/tags/v1.0".to_string(), SHA_B.to_string()),
        ]
    );
}

#[test]
fn test_packed_refs_skips_malformed_lines() {
    let content = format!(
        "\n{}\nnot-a-sha refs/heads/bad\n{} refs/heads/ok extra tokens\n",
        SHA_A, SHA_B
    );
    let refs = parse_packed_refs(&content);
    assert_eq!(refs, vec![("refs/heads/ok".to_string(), SHA_B.to_string())]);
}

#[test]
fn test_packed_refs_empty() {
    assert!(parse_packed_refs("").is_empty());
    assert!(parse_packed_refs("# only a header\n").is_empty());
}

// ─── Ref table tests ────────────────────────────────────────────────

#[test]
fn test_ref_table_loose_overrides_packed() {
    let index = ByteIndex::from_files([
        ("packed-refs", format!("{} refs/heads/main\n{} refs/tags/v1\n", SHA_A, SHA_B)),
        ("refs/heads/main", format!("{}\n", SHA_C)),
    ]);
    let table = build_ref_table(&index).unwrap();
    assert_eq!(table.get("refs/heads/main").map(String::as_str), Some(SHA_C));
    assert_eq!(table.get("refs/tags/v1").map(String::as_str), Some(SHA_B));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_ref_table_without_packed_refs() {
    let index = ByteIndex::from_files([
        ("refs/heads/main", "abc1234\n"),
        ("refs/remotes/origin/main", "abc1234\n"),
    ]);
    let table = build_ref_table(&index).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_ref_table_skips_symbolic_and_empty_loose_refs() {
    let index = ByteIndex::from_files([
        ("refs/remotes/origin/HEAD", "ref: refs/remotes/origin/main\n"),
        ("refs/heads/empty", ""),
        ("refs/heads/main", "abc1234"),
    ]);
    let table = build_ref_table(&index).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.contains_key("refs/heads/main"));
}

#[test]
fn test_ref_table_special_refs() {
    let index = ByteIndex::from_files([
        ("ORIG_HEAD", format!("{}\n", SHA_A)),
        (
            "FETCH_HEAD",
            format!("{}\t\tbranch 'main' of https://example.com/repo\n", SHA_B),
        ),
        ("MERGE_HEAD", "garbage".to_string()),
    ]);
    let table = build_ref_table(&index).unwrap();
    assert_eq!(table.get("ORIG_HEAD").map(String::as_str), Some(SHA_A));
    assert_eq!(table.get("FETCH_HEAD").map(String::as_str), Some(SHA_B));
    assert!(!table.contains_key("MERGE_HEAD"));
}

#[test]
fn test_ref_table_ids_are_lowercased() {
    let index = ByteIndex::from_files([("refs/heads/main", "ABCDEF1234")]);
    let table = build_ref_table(&index).unwrap();
    assert_eq!(table.get("refs/heads/main").map(String::as_str), Some("abcdef1234"));
}

// ─── Config tests ───────────────────────────────────────────────────

#[test]
fn test_config_single_remote() {
    let content = "\
[core]
\trepositoryformatversion = 0
[remote \"origin\"]
\turl = https://example.com/repo.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
\tpushurl = git@example.com:repo.git
";
    let config = parse_remotes(content, false);
    assert_eq!(config.remotes.len(), 1);
    let origin = config.find("origin").unwrap();
    // fetch appears after url, so it wins
    assert_eq!(origin.fetch_url.as_deref(), Some("+refs/heads/*:refs/remotes/origin/*"));
    assert_eq!(origin.push_url.as_deref(), Some("git@example.com:repo.git"));
    assert!(config.raw.is_none());
}

#[test]
fn test_config_url_after_fetch_wins() {
    let content = "[remote \"origin\"]\nfetch = +refs/heads/*:refs/remotes/origin/*\nurl = https://x/y.git\n";
    let config = parse_remotes(content, false);
    assert_eq!(config.remotes[0].fetch_url.as_deref(), Some("https://x/y.git"));
}

#[test]
fn test_config_duplicate_remote_last_wins() {
    let content = "\
[remote \"origin\"]
url = https://first.example.com/repo.git
[remote \"upstream\"]
url = https://upstream.example.com/repo.git
[remote \"origin\"]
url = https://second.example.com/repo.git
";
    let config = parse_remotes(content, false);
    assert_eq!(config.remotes.len(), 2);
    assert_eq!(config.remotes[0].name, "origin");
    assert_eq!(
        config.remotes[0].fetch_url.as_deref(),
        Some("https://second.example.com/repo.git")
    );
    assert_eq!(config.remotes[1].name, "upstream");
}

#[test]
fn test_config_keys_outside_remote_ignored() {
    let content = "url = https://orphan\n[branch \"main\"]\nurl = https://branch\n[remote \"origin\"]\n";
    let config = parse_remotes(content, false);
    assert_eq!(config.remotes.len(), 1);
    assert_eq!(config.remotes[0].fetch_url, None);
}

#[test]
fn test_config_comments_and_case() {
    let content = "; comment\n# another\n[REMOTE \"Origin\"]\n  URL = https://x\n  PushURL = https://y\n";
    let config = parse_remotes(content, false);
    let remote = config.find("Origin").unwrap();
    assert_eq!(remote.fetch_url.as_deref(), Some("https://x"));
    assert_eq!(remote.push_url.as_deref(), Some("https://y"));
}

#[test]
fn test_config_raw_text_only_when_requested() {
    let content = "[remote \"origin\"]\nurl = https://x\n";
    assert_eq!(parse_remotes(content, true).raw.as_deref(), Some(content));
    assert_eq!(parse_remotes(content, false).raw, None);
}

#[test]
fn test_config_malformed_section_header() {
    let content = "[remote \"origin\"\nurl = https://x\n[remote origin]\nurl = https://y\n";
    let config = parse_remotes(content, false);
    assert!(config.remotes.is_empty());
}

// ─── Reflog tests ───────────────────────────────────────────────────

fn reflog_line(old: &str, new: &str, who: &str, ts: i64, msg: &str) -> String {
    format!("{} {} {} {} +0200\t{}\n", old, new, who, ts, msg)
}

#[test]
fn test_reflog_basic_fields() {
    let content = reflog_line(
        "0000000000000000000000000000000000000000",
        SHA_A,
        "Jane Q. Dev <jane@example.com>",
        1_700_000_000,
        "commit (initial): first",
    );
    let entries = parse_reflog(&content, "HEAD", 100);
    assert_eq!(entries.len(), 1);
    let e = &entries[0];
    assert_eq!(e.old_id, "0000000000000000000000000000000000000000");
    assert_eq!(e.new_id, SHA_A);
    assert_eq!(e.author_name, "Jane Q. Dev");
    assert_eq!(e.author_email, "jane@example.com");
    assert_eq!(e.timestamp_ms, 1_700_000_000_000);
    assert_eq!(e.timezone, "+0200");
    assert_eq!(e.message, "commit (initial): first");
    assert_eq!(e.source_ref, "HEAD");
}

#[test]
fn test_reflog_without_message() {
    let content = format!("{} {} Dev <d@x> 1700000000 -0500\n", SHA_A, SHA_B);
    let entries = parse_reflog(&content, "refs/heads/main", 100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "");
    assert_eq!(entries[0].timezone, "-0500");
}

#[test]
fn test_reflog_empty_author_name() {
    let content = format!("{} {} <bot@x> 1700000000 +0000\tfetch: fast-forward\n", SHA_A, SHA_B);
    let entries = parse_reflog(&content, "HEAD", 100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author_name, "");
    assert_eq!(entries[0].author_email, "bot@x");
}

#[test]
fn test_reflog_message_keeps_tabs_after_first() {
    let content = format!("{} {} Dev <d@x> 1700000000 +0000\tmerge a\tb\n", SHA_A, SHA_B);
    let entries = parse_reflog(&content, "HEAD", 100);
    assert_eq!(entries[0].message, "merge a\tb");
}

#[test]
fn test_reflog_skips_malformed_lines() {
    let content = [
        "garbage line\n".to_string(),
        format!("{} {} Dev <d@x> notanumber +0000\tx\n", SHA_A, SHA_B),
        format!("{} {} Dev <d@x> 1700000000 +00\tbad tz\n", SHA_A, SHA_B),
        format!("zzz {} Dev <d@x> 1700000000 +0000\tbad old id\n", SHA_B),
        format!("{} {} Dev <d@x> 0 +0000\tzero ts\n", SHA_A, SHA_B),
        "\n".to_string(),
        reflog_line(SHA_A, SHA_B, "Dev <d@x>", 1_700_000_100, "commit: ok"),
    ]
    .concat();
    let entries = parse_reflog(&content, "HEAD", 100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "commit: ok");
}

#[test]
fn test_reflog_requires_ascii_digits() {
    let content = [
        format!("{} {} Dev <d@x> 1700000000 +\u{0660}\u{0660}\u{0660}\u{0660}\tcommit: x\n", SHA_A, SHA_B),
        format!("{} {} Dev <d@x> 17000000\u{0661}\u{0662} +0000\tcommit: y\n", SHA_A, SHA_B),
    ]
    .concat();
    assert!(parse_reflog(&content, "HEAD", 100).is_empty());
}

#[test]
fn test_reflog_name_must_be_separated_from_email() {
    let glued = format!("{} {} Dev<d@x> 1700000000 +0000\tcommit: x\n", SHA_A, SHA_B);
    assert!(parse_reflog(&glued, "HEAD", 100).is_empty());

    let spaced = format!("{} {} Dev  <d@x> 1700000000 +0000\tcommit: x\n", SHA_A, SHA_B);
    let entries = parse_reflog(&spaced, "HEAD", 100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author_name, "Dev");
}

#[test]
fn test_reflog_cap_per_file() {
    let content: String = (0..10)
        .map(|i| reflog_line(SHA_A, SHA_B, "Dev <d@x>", 1_700_000_000 + i, "commit: x"))
        .collect();
    let entries = parse_reflog(&content, "HEAD", 3);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].timestamp_ms, 1_700_000_002_000, "file order is kept");
}

#[test]
fn test_reflog_crlf_lines() {
    let content = format!("{} {} Dev <d@x> 1700000000 +0000\tcommit: x\r\n", SHA_A, SHA_B);
    let entries = parse_reflog(&content, "HEAD", 100);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "commit: x");
}

#[test]
fn test_reflog_source_ref_mapping() {
    assert_eq!(reflog_source_ref("logs/HEAD"), Some("HEAD"));
    assert_eq!(reflog_source_ref("logs/refs/heads/main"), Some("refs/heads/main"));
    assert_eq!(reflog_source_ref("logs/refs/remotes/origin/main"), Some("refs/remotes/origin/main"));
    assert_eq!(reflog_source_ref("logs/other"), None);
    assert_eq!(reflog_source_ref("refs/heads/main"), None);
}

#[test]
fn test_collect_reflogs_from_index() {
    let index = ByteIndex::from_files([
        ("logs/HEAD", reflog_line(SHA_A, SHA_B, "Dev <d@x>", 1_700_000_000, "commit: a")),
        ("logs/refs/heads/main", reflog_line(SHA_A, SHA_B, "Dev <d@x>", 1_700_000_000, "commit: a")),
        ("logs/refs/heads/dev", reflog_line(SHA_B, SHA_C, "Dev <d@x>", 1_700_000_500, "commit: b")),
    ]);
    let map = collect_reflogs(&index, 100).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["HEAD", "refs/heads/dev", "refs/heads/main"]);
    assert_eq!(map["refs/heads/dev"][0].source_ref, "refs/heads/dev");
}

// ─── Date display tests ─────────────────────────────────────────────

#[test]
fn test_format_event_date_utc() {
    assert_eq!(format_event_date(1_700_000_000, "+0000"), "2023-11-14 22:13:20 +0000");
}

#[test]
fn test_format_event_date_applies_offset() {
    assert_eq!(format_event_date(1_700_000_000, "+0200"), "2023-11-15 00:13:20 +0200");
    assert_eq!(format_event_date(1_700_000_000, "-0530"), "2023-11-14 16:43:20 -0530");
}

#[test]
fn test_format_event_date_bad_offset_is_utc() {
    assert_eq!(format_event_date(0, "junk"), "1970-01-01 00:00:00 junk");
}

#[test]
fn test_format_event_date_non_ascii_offset_is_utc() {
    assert_eq!(
        format_event_date(0, "+\u{0660}\u{0660}\u{0660}\u{0660}"),
        "1970-01-01 00:00:00 +\u{0660}\u{0660}\u{0660}\u{0660}"
    );
}

#[test]
fn test_format_event_date_calendar_edges() {
    assert_eq!(format_event_date(-1, "+0000"), "1969-12-31 23:59:59 +0000");
    assert_eq!(format_event_date(1_709_164_800, "+0000"), "2024-02-29 00:00:00 +0000");
    assert_eq!(format_event_date(1_709_251_199, "-0100"), "2024-02-29 22:59:59 -0100");
}
