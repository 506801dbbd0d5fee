// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator tests drive handlers synchronously: work units that read
//! files run inline, wait-shaped units (watcher, heartbeat, delayed scans)
//! are skipped and asserted on directly.

use super::*;
use crate::msg::{Cmd, Msg};
use crate::preload::preload_overview;
use crate::test_support::{FakeView, ViewCall};
use runboard_adapters::scan_run_dirs;
use runboard_core::test_support::{exit_record, history_record, run_record};
use runboard_core::{Config, Record};
use runboard_storage::writer::write_log;
use std::collections::VecDeque;
use std::path::Path;
use tempfile::TempDir;

mod dirs;
mod liveness;
mod selection;

pub(super) const KEY_A: &str = "run-20240301_000000-aaa111";
pub(super) const KEY_B: &str = "run-20240201_000000-bbb222";
pub(super) const KEY_C: &str = "offline-run-20240101_000000-ccc333";

pub(super) fn key(name: &str) -> RunKey {
    RunKey::new(name)
}

/// Write a run directory with the given records under `root`.
pub(super) fn write_run(root: &Path, key_name: &str, records: &[Record]) {
    let run_key = RunKey::new(key_name);
    let path = run_key.log_path(root).unwrap();
    write_log(&path, records).unwrap();
}

pub(super) fn coordinator(root: &Path) -> WorkspaceCoordinator<FakeView> {
    coordinator_with(root, WorkspaceOptions::new(root.to_path_buf(), Config::default()))
}

pub(super) fn coordinator_with(
    _root: &Path,
    opts: WorkspaceOptions,
) -> WorkspaceCoordinator<FakeView> {
    WorkspaceCoordinator::new(opts, FakeView::new())
}

/// Synchronous stand-in for the executor. Wait-shaped units return nothing.
pub(super) fn exec(cmd: Cmd) -> Option<Msg> {
    match cmd {
        Cmd::ScanRunDirs { root, delay: None } => match scan_run_dirs(&root) {
            Ok(run_keys) => Some(Msg::RunDirs {
                run_keys,
                err: None,
            }),
            Err(err) => Some(Msg::RunDirs {
                run_keys: Vec::new(),
                err: Some(err.to_string()),
            }),
        },
        Cmd::ScanRunDirs { delay: Some(_), .. } => None,
        Cmd::InitReader { run_key, path } => match TailController::open(&path) {
            Ok(tail) => Some(Msg::ReaderInit {
                run_key,
                tail: Arc::new(tail),
            }),
            Err(err) => Some(Msg::RunFailed {
                run_key,
                error: err.to_string(),
            }),
        },
        Cmd::BootChunk {
            run_key,
            tail,
            budget,
        } => match tail.read_all_chunked(&budget) {
            Ok(batch) => Some(Msg::ChunkedBatch { run_key, batch }),
            Err(err) => Some(Msg::RunFailed {
                run_key,
                error: err.to_string(),
            }),
        },
        Cmd::LiveDrain {
            run_key,
            tail,
            budget,
        } => match tail.read_available(&budget) {
            Ok(Some(msgs)) => Some(Msg::Batch { run_key, msgs }),
            Ok(None) => None,
            Err(err) => Some(Msg::RunFailed {
                run_key,
                error: err.to_string(),
            }),
        },
        Cmd::WaitFileChange { .. } | Cmd::WaitHeartbeat { .. } => None,
        Cmd::Preload { run_key, path } => Some(Msg::OverviewPreloaded {
            run_key,
            result: preload_overview(&path),
        }),
    }
}

/// Run units breadth-first until none remain.
pub(super) fn pump(coordinator: &mut WorkspaceCoordinator<FakeView>, cmds: Vec<Cmd>) {
    let mut queue: VecDeque<Cmd> = cmds.into();
    while let Some(cmd) = queue.pop_front() {
        if let Some(msg) = exec(cmd) {
            queue.extend(coordinator.handle(msg));
        }
    }
}

/// Scan the root and pump the resulting work to completion.
pub(super) fn discover(coordinator: &mut WorkspaceCoordinator<FakeView>) {
    let cmds = coordinator.bootstrap();
    pump(coordinator, cmds);
}

#[test]
fn boot_flows_from_discovery_to_live() {
    let dir = TempDir::new().unwrap();
    write_run(
        dir.path(),
        KEY_A,
        &[
            run_record("aaa111", "warm-sunset-7", "mnist"),
            history_record(1, &[("loss", "0.9")]),
            history_record(2, &[("loss", "0.8")]),
        ],
    );

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);

    assert_eq!(coordinator.run_keys(), &[key(KEY_A)]);
    assert!(coordinator.selected().contains(&key(KEY_A)));
    assert_eq!(coordinator.pinned(), Some(&key(KEY_A)));
    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Live));
    assert!(coordinator.has_live_runs());
    assert!(coordinator.heartbeat_running());

    let overview = coordinator.overview(&key(KEY_A)).unwrap();
    assert_eq!(overview.title(), "warm-sunset-7");
    assert_eq!(overview.state, RunState::Live);

    let history_calls: Vec<_> = coordinator
        .view()
        .calls
        .iter()
        .filter(|call| matches!(call, ViewCall::AppendHistory { .. }))
        .collect();
    assert_eq!(history_calls.len(), 1, "one merged history per chunk");
}

#[test]
fn exited_run_finishes_without_watcher_or_heartbeat() {
    let dir = TempDir::new().unwrap();
    write_run(
        dir.path(),
        KEY_A,
        &[history_record(1, &[("loss", "0.9")]), exit_record(0)],
    );

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);

    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Finished));
    assert!(!coordinator.has_live_runs());
    assert!(!coordinator.heartbeat_running());
    let overview = coordinator.overview(&key(KEY_A)).unwrap();
    assert_eq!(overview.exit_code, Some(0));
}

#[test]
fn failed_exit_code_marks_run_failed() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[exit_record(2)]);

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);

    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Failed));
    assert_eq!(
        coordinator.overview(&key(KEY_A)).unwrap().exit_code,
        Some(2)
    );
}

#[test]
fn multi_chunk_boot_reaches_live_with_all_history() {
    let dir = TempDir::new().unwrap();
    let records: Vec<Record> = (1..=25)
        .map(|step| history_record(step, &[("loss", "0.5")]))
        .collect();
    write_run(dir.path(), KEY_A, &records);

    let mut config = Config::default();
    config.boot_chunk_records = 10;
    let mut coordinator = coordinator_with(
        dir.path(),
        WorkspaceOptions::new(dir.path().to_path_buf(), config),
    );
    discover(&mut coordinator);

    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Live));
    // 25 records at 10 per chunk: three history batches reached the view.
    let history_calls = coordinator
        .view()
        .calls
        .iter()
        .filter(|call| matches!(call, ViewCall::AppendHistory { .. }))
        .count();
    assert_eq!(history_calls, 3);
}

#[test]
fn unreadable_log_marks_run_failed_but_workspace_survives() {
    let dir = TempDir::new().unwrap();
    // KEY_A has a log that is not a run log at all.
    let bad = key(KEY_A).log_path(dir.path()).unwrap();
    std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
    std::fs::write(&bad, b"garbage").unwrap();
    write_run(dir.path(), KEY_B, &[exit_record(0)]);

    let opts = WorkspaceOptions {
        select_all: true,
        ..WorkspaceOptions::new(dir.path().to_path_buf(), Config::default())
    };
    let mut coordinator = coordinator_with(dir.path(), opts);
    discover(&mut coordinator);

    assert_eq!(
        coordinator.overview(&key(KEY_A)).unwrap().state,
        RunState::Failed
    );
    assert_eq!(coordinator.state_of(&key(KEY_B)), Some(RunState::Finished));
}
