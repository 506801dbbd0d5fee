// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn temp_log(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("run-ab12cd.wandb");
    std::fs::write(&path, b"header").unwrap();
    path
}

fn append(path: &Path, bytes: &[u8]) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
}

#[tokio::test]
async fn wait_returns_after_file_grows() {
    let dir = tempdir().unwrap();
    let path = temp_log(&dir);
    let watcher = FileWatcher::new();
    watcher.start(&path).unwrap();

    append(&path, b"more");
    let msg = timeout(WAIT, watcher.wait_for_msg()).await.unwrap();
    assert_eq!(msg, Some(()));
    watcher.finish();
}

#[tokio::test]
async fn events_coalesce_into_single_slot() {
    let dir = tempdir().unwrap();
    let path = temp_log(&dir);
    let watcher = FileWatcher::new();
    watcher.start(&path).unwrap();

    for _ in 0..20 {
        append(&path, b"x");
    }
    // First wait observes a pending (coalesced) notification.
    let msg = timeout(WAIT, watcher.wait_for_msg()).await.unwrap();
    assert_eq!(msg, Some(()));
    watcher.finish();
}

#[tokio::test]
async fn start_twice_is_an_error() {
    let dir = tempdir().unwrap();
    let path = temp_log(&dir);
    let watcher = FileWatcher::new();
    watcher.start(&path).unwrap();
    assert!(matches!(
        watcher.start(&path),
        Err(WatchError::AlreadyStarted)
    ));
    watcher.finish();
}

#[tokio::test]
async fn start_on_missing_path_fails_and_stays_unstarted() {
    let dir = tempdir().unwrap();
    let watcher = FileWatcher::new();
    let err = watcher.start(&dir.path().join("missing.wandb"));
    assert!(matches!(err, Err(WatchError::Notify(_))));
    assert!(!watcher.is_started());
}

#[tokio::test]
async fn finish_unblocks_a_pending_waiter() {
    let dir = tempdir().unwrap();
    let path = temp_log(&dir);
    let watcher = Arc::new(FileWatcher::new());
    watcher.start(&path).unwrap();

    let waiter = {
        let watcher = Arc::clone(&watcher);
        tokio::spawn(async move { watcher.wait_for_msg().await })
    };
    // Give the waiter time to block before releasing the watch.
    tokio::time::sleep(Duration::from_millis(50)).await;
    watcher.finish();

    let msg = timeout(WAIT, waiter).await.unwrap().unwrap();
    assert_eq!(msg, None);
    assert!(!watcher.is_started());
}

#[tokio::test]
async fn finish_is_idempotent_and_allows_restart() {
    let dir = tempdir().unwrap();
    let path = temp_log(&dir);
    let watcher = FileWatcher::new();
    watcher.start(&path).unwrap();
    watcher.finish();
    watcher.finish();
    assert!(!watcher.is_started());

    watcher.start(&path).unwrap();
    assert!(watcher.is_started());
    append(&path, b"more");
    let msg = timeout(WAIT, watcher.wait_for_msg()).await.unwrap();
    assert_eq!(msg, Some(()));
    watcher.finish();
}

#[tokio::test]
async fn wait_without_start_returns_none() {
    let watcher = FileWatcher::new();
    assert_eq!(watcher.wait_for_msg().await, None);
}
