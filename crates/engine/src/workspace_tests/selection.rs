// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn two_run_workspace() -> (TempDir, WorkspaceCoordinator<FakeView>) {
    let dir = TempDir::new().unwrap();
    write_run(
        dir.path(),
        KEY_A,
        &[
            run_record("aaa111", "newest", "mnist"),
            history_record(1, &[("loss", "0.9")]),
        ],
    );
    write_run(
        dir.path(),
        KEY_B,
        &[run_record("bbb222", "older", "mnist")],
    );
    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);
    (dir, coordinator)
}

#[test]
fn toggle_selects_then_deselects() {
    let (_dir, mut coordinator) = two_run_workspace();
    // Auto-selection took the newest run.
    assert!(coordinator.selected().contains(&key(KEY_A)));
    assert!(!coordinator.selected().contains(&key(KEY_B)));

    let cmds = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });
    assert!(matches!(cmds[0], Cmd::InitReader { .. }));
    pump(&mut coordinator, cmds);
    assert_eq!(coordinator.state_of(&key(KEY_B)), Some(RunState::Live));

    let cmds = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });
    assert!(cmds.is_empty());
    assert!(!coordinator.selected().contains(&key(KEY_B)));
    assert_eq!(coordinator.state_of(&key(KEY_B)), None);
    assert!(coordinator.view().removed(&key(KEY_B)));
    assert_eq!(
        coordinator.overview(&key(KEY_B)).unwrap().state,
        RunState::Closed
    );
}

#[test]
fn deselecting_the_last_live_run_stops_the_heartbeat() {
    let (_dir, mut coordinator) = two_run_workspace();
    assert!(coordinator.heartbeat_running());

    let cmds = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_A),
    });
    assert!(cmds.is_empty());
    assert!(!coordinator.has_live_runs());
    assert!(!coordinator.heartbeat_running());
}

#[test]
fn selection_raced_reader_init_closes_the_new_reader() {
    let (dir, mut coordinator) = two_run_workspace();

    // Ask for KEY_B, then deselect before the reader resolves.
    let init_cmds = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });
    assert_eq!(init_cmds.len(), 1);
    coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });

    let path = key(KEY_B).log_path(dir.path()).unwrap();
    let tail = Arc::new(TailController::open(&path).unwrap());
    let cmds = coordinator.handle(Msg::ReaderInit {
        run_key: key(KEY_B),
        tail: Arc::clone(&tail),
    });

    assert!(cmds.is_empty());
    assert!(tail.is_closed(), "raced reader must be closed silently");
    assert_eq!(coordinator.state_of(&key(KEY_B)), None);
}

#[test]
fn pinning_a_non_selected_run_selects_it_first() {
    let (_dir, mut coordinator) = two_run_workspace();
    assert_eq!(coordinator.pinned(), Some(&key(KEY_A)));

    let cmds = coordinator.handle(Msg::PinRun {
        run_key: key(KEY_B),
    });
    assert!(matches!(cmds[0], Cmd::InitReader { .. }));
    assert_eq!(coordinator.pinned(), Some(&key(KEY_B)));
    assert!(coordinator.selected().contains(&key(KEY_B)));
    assert!(coordinator.view().promoted(&key(KEY_B)));
    pump(&mut coordinator, cmds);

    // Invariant: the pinned run is always selected.
    let pinned = coordinator.pinned().unwrap().clone();
    assert!(coordinator.selected().contains(&pinned));
}

#[test]
fn pinning_a_selected_run_only_promotes() {
    let (_dir, mut coordinator) = two_run_workspace();
    let cmds = coordinator.handle(Msg::PinRun {
        run_key: key(KEY_A),
    });
    assert!(cmds.is_empty());
    assert_eq!(coordinator.pinned(), Some(&key(KEY_A)));
}

#[test]
fn deselecting_the_pinned_run_unpins() {
    let (_dir, mut coordinator) = two_run_workspace();
    coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_A),
    });
    assert_eq!(coordinator.pinned(), None);
}

#[test]
fn toggle_for_unknown_run_is_ignored() {
    let (_dir, mut coordinator) = two_run_workspace();
    let cmds = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key("run-20990101_000000-zzz"),
    });
    assert!(cmds.is_empty());
    assert!(!coordinator.selected().contains(&key("run-20990101_000000-zzz")));
}

#[test]
fn quit_closes_readers_and_ignores_later_messages() {
    let (_dir, mut coordinator) = two_run_workspace();
    assert!(coordinator.heartbeat_running());

    let cmds = coordinator.handle(Msg::Quit);
    assert!(cmds.is_empty());
    assert!(coordinator.is_quitting());
    assert!(!coordinator.heartbeat_running());
    assert!(!coordinator.has_live_runs());

    let cmds = coordinator.handle(Msg::Heartbeat);
    assert!(cmds.is_empty());
}
