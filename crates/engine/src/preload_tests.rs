// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use runboard_core::test_support::{history_record, run_record};
use runboard_storage::writer::{write_log, FramedLogWriter};
use tempfile::tempdir;

fn key(n: usize) -> RunKey {
    RunKey::new(format!("run-20240101_00000{n}-id{n}"))
}

#[test]
fn cap_limits_in_flight_and_all_keys_complete() {
    // S5: enqueue 10, at most 4 in flight, all eventually done.
    let mut preloader = OverviewPreloader::new(4);
    for n in 0..10 {
        preloader.enqueue(key(n));
    }

    let mut done = 0;
    while done < 10 {
        let startable = preloader.dequeue_startable();
        assert!(preloader.in_flight() <= 4);
        if startable.is_empty() {
            panic!("queue stalled with {done} done");
        }
        for k in startable {
            preloader.mark_done(&k);
            done += 1;
        }
    }
    assert_eq!(preloader.in_flight(), 0);
    assert_eq!(preloader.pending(), 0);
}

#[test]
fn enqueue_is_idempotent_while_pending_or_in_flight() {
    let mut preloader = OverviewPreloader::new(2);
    preloader.enqueue(key(1));
    preloader.enqueue(key(1));
    assert_eq!(preloader.pending(), 1);

    let started = preloader.dequeue_startable();
    assert_eq!(started.len(), 1);
    preloader.enqueue(key(1));
    assert_eq!(preloader.pending(), 0, "in-flight key must not requeue");
}

#[test]
fn dequeue_preserves_fifo_order() {
    let mut preloader = OverviewPreloader::new(2);
    for n in 0..4 {
        preloader.enqueue(key(n));
    }
    assert_eq!(preloader.dequeue_startable(), vec![key(0), key(1)]);
    assert!(preloader.dequeue_startable().is_empty());

    preloader.mark_done(&key(0));
    assert_eq!(preloader.dequeue_startable(), vec![key(2)]);
}

#[test]
fn drop_queued_not_present_spares_in_flight() {
    let mut preloader = OverviewPreloader::new(1);
    for n in 0..3 {
        preloader.enqueue(key(n));
    }
    let started = preloader.dequeue_startable();
    assert_eq!(started, vec![key(0)]);

    // Only key(1) survives the directory listing.
    let present: HashSet<RunKey> = [key(0), key(1)].into_iter().collect();
    preloader.drop_queued_not_present(&present);
    assert_eq!(preloader.pending(), 1);
    assert_eq!(preloader.in_flight(), 1);

    preloader.mark_done(&key(0));
    assert_eq!(preloader.dequeue_startable(), vec![key(1)]);
}

#[test]
fn preload_finds_identity_within_scan_depth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run-aa.wandb");
    write_log(
        &path,
        &[
            history_record(1, &[("loss", "0.5")]),
            run_record("ab12cd", "warm-sunset-7", "mnist"),
        ],
    )
    .unwrap();

    let PreloadResult::Identity(run) = preload_overview(&path) else {
        panic!("expected identity");
    };
    assert_eq!(run.id, "ab12cd");
    assert_eq!(run.display_name.as_deref(), Some("warm-sunset-7"));
}

#[test]
fn preload_gives_up_after_scan_depth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run-aa.wandb");
    let records: Vec<_> = (0..PRELOAD_SCAN_RECORDS as i64 + 5)
        .map(|step| history_record(step, &[("loss", "0.5")]))
        .collect();
    write_log(&path, &records).unwrap();

    assert!(matches!(preload_overview(&path), PreloadResult::NotFound));
}

#[test]
fn preload_missing_and_short_logs_are_not_found() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        preload_overview(&dir.path().join("missing.wandb")),
        PreloadResult::NotFound
    ));

    // Header not fully present yet: soft EOF on the first read.
    let path = dir.path().join("run-bb.wandb");
    let mut writer = FramedLogWriter::create_headerless(&path).unwrap();
    writer.append_raw(b":W").unwrap();
    writer.flush().unwrap();
    assert!(matches!(preload_overview(&path), PreloadResult::NotFound));
}

#[test]
fn preload_reports_corrupt_logs_as_failed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run-cc.wandb");
    std::fs::write(&path, b"this is not a run log at all").unwrap();
    assert!(matches!(preload_overview(&path), PreloadResult::Failed(_)));
}
