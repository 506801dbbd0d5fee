// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn mkrun(root: &Path, name: &str) {
    std::fs::create_dir_all(root.join(name)).unwrap();
}

#[yare::parameterized(
    online = { "run-20240315_101500-ab12cd", true },
    offline = { "offline-run-20240315_101500-ab12cd", true },
    wrong_prefix = { "sweep-20240315_101500-ab12cd", false },
    bad_month = { "run-20241315_101500-ab12cd", false },
    bad_time = { "run-20240315_250000-ab12cd", false },
    short_timestamp = { "run-2024_1015-ab12cd", false },
    missing_id = { "run-20240315_101500-", false },
    no_id_separator = { "run-20240315_101500ab", false },
    plain_file = { "config.yaml", false },
)]
fn run_dir_name_validation(name: &str, valid: bool) {
    assert_eq!(is_run_dir_name(name), valid, "{name}");
}

#[test]
fn scan_returns_only_run_dirs_newest_first() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    mkrun(root, "run-20240101_000000-aaa");
    mkrun(root, "run-20240301_000000-bbb");
    mkrun(root, "offline-run-20240201_000000-ccc");
    mkrun(root, "not-a-run");
    std::fs::write(root.join("run-20240401_000000-file"), b"x").unwrap();

    let keys = scan_run_dirs(root).unwrap();
    let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "run-20240301_000000-bbb",
            "offline-run-20240201_000000-ccc",
            "run-20240101_000000-aaa",
        ]
    );
}

#[test]
fn scan_missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let err = scan_run_dirs(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, DiscoveryError::Io { .. }));
}

#[test]
fn scan_empty_root_is_empty() {
    let dir = tempdir().unwrap();
    assert!(scan_run_dirs(dir.path()).unwrap().is_empty());
}

#[test]
#[serial_test::serial]
fn resolve_root_prefers_argument_over_env() {
    std::env::set_var(ROOT_ENV, "/from/env");
    assert_eq!(
        resolve_root(Some(Path::new("/from/arg"))),
        PathBuf::from("/from/arg")
    );
    assert_eq!(resolve_root(None), PathBuf::from("/from/env"));
    std::env::remove_var(ROOT_ENV);
    assert_eq!(resolve_root(None), PathBuf::from("wandb"));
}

#[cfg(unix)]
#[test]
fn latest_run_reads_the_symlink() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    mkrun(root, "run-20240301_000000-bbb");
    std::os::unix::fs::symlink(
        root.join("run-20240301_000000-bbb"),
        root.join("latest-run"),
    )
    .unwrap();

    assert_eq!(
        latest_run(root),
        Some(runboard_core::RunKey::new("run-20240301_000000-bbb"))
    );
    assert_eq!(latest_run(&root.join("elsewhere")), None);
}
