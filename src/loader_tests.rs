//! Loader tests against synthetic `.git` directories on disk.

use std::fs;
use std::path::Path;

use super::*;
use crate::snapshot::{AnalyzeOptions, RepoIdentity, SourceKind, analyze};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_repo(root: &Path) {
    write(root, ".git/HEAD", "ref: refs/heads/main\n");
    write(root, ".git/config", "[remote \"origin\"]\n\turl = https://example.com/r.git\n");
    write(root, ".git/refs/heads/main", "abc1234\n");
    write(root, ".git/refs/tags/v1", "abc1234\n");
    write(
        root,
        ".git/logs/HEAD",
        "0000000 abc1234 Dev <d@x> 1700000000 +0000\tcommit (initial): init\n",
    );
    write(root, ".git/objects/ab/c1234", "binary object");
    write(root, ".git/hooks/pre-commit", "#!/bin/sh\n");
    write(root, ".git/description", "Unnamed repository\n");
    write(root, "README.md", "not part of .git\n");
}

#[test]
fn test_is_control_path() {
    assert!(is_control_path("HEAD"));
    assert!(is_control_path("packed-refs"));
    assert!(is_control_path("config"));
    assert!(is_control_path("FETCH_HEAD"));
    assert!(is_control_path("refs/heads/main"));
    assert!(is_control_path("logs/refs/heads/main"));
    assert!(!is_control_path("description"));
    assert!(!is_control_path("objects/ab/c1234"));
    assert!(!is_control_path("index"));
}

#[test]
fn test_load_collects_only_control_files() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let index = load_git_dir(tmp.path(), &LoadLimits::default()).unwrap();
    let keys: Vec<&str> = index.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["HEAD", "config", "logs/HEAD", "refs/heads/main", "refs/tags/v1"]);

    let expected: u64 = index.iter().map(|(_, e)| e.size).sum();
    assert_eq!(index.total_bytes(), expected);
}

#[test]
fn test_load_accepts_control_dir_directly() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let index = load_git_dir(&tmp.path().join(".git"), &LoadLimits::default()).unwrap();
    assert!(index.get("HEAD").is_some());
}

#[test]
fn test_load_follows_gitdir_pointer() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "store/HEAD", "abc1234\n");
    write(tmp.path(), "work/.git", "gitdir: ../store\n");

    let index = load_git_dir(&tmp.path().join("work"), &LoadLimits::default()).unwrap();
    assert_eq!(index.len(), 1);
}

#[test]
fn test_load_missing_git_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let err = load_git_dir(tmp.path(), &LoadLimits::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::GitDirNotFound(_)));
}

#[test]
fn test_load_file_cap_truncates() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let limits = LoadLimits { max_files: 2, ..LoadLimits::default() };
    let index = load_git_dir(tmp.path(), &limits).unwrap();
    assert_eq!(index.len(), 2);
}

#[test]
fn test_load_strict_byte_cap_fails() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let limits = LoadLimits { max_bytes: 10, strict: true, ..LoadLimits::default() };
    let err = load_git_dir(tmp.path(), &limits).unwrap_err();
    assert!(matches!(err, SnapshotError::LimitExceeded { kind: "bytes", .. }));
}

#[test]
fn test_loaded_index_analyzes() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let index = load_git_dir(tmp.path(), &LoadLimits::default()).unwrap();
    let identity = RepoIdentity::new("fixture", SourceKind::Directory, 0);
    let snapshot = analyze(&index, identity, &AnalyzeOptions::default()).unwrap();
    assert_eq!(snapshot.stats.total_refs, 2);
    assert_eq!(snapshot.stats.tags, 1);
    assert_eq!(snapshot.events.len(), 1);
    assert_eq!(snapshot.remote_config.remotes[0].name, "origin");
}

#[test]
fn test_file_removed_after_load_fails_analysis() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_repo(tmp.path());

    let index = load_git_dir(tmp.path(), &LoadLimits::default()).unwrap();
    fs::remove_file(tmp.path().join(".git/config")).unwrap();

    let identity = RepoIdentity::new("fixture", SourceKind::Directory, 0);
    let err = analyze(&index, identity, &AnalyzeOptions::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::AnalysisFailed { ref path, .. } if path == "config"));
}
