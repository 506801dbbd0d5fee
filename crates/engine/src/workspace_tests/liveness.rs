// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use runboard_storage::writer::FramedLogWriter;

/// A live run plus the writer still appending to its log.
fn live_run() -> (TempDir, WorkspaceCoordinator<FakeView>, FramedLogWriter) {
    let dir = TempDir::new().unwrap();
    let path = key(KEY_A).log_path(dir.path()).unwrap();
    let mut writer = FramedLogWriter::create(&path).unwrap();
    writer
        .append(&run_record("aaa111", "warm-sunset-7", "mnist"))
        .unwrap();
    writer.append(&history_record(1, &[("loss", "0.9")])).unwrap();
    writer.flush().unwrap();

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);
    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Live));
    (dir, coordinator, writer)
}

#[test]
fn file_change_triggers_one_drain_and_rearms_the_watcher() {
    let (_dir, mut coordinator, _writer) = live_run();

    let cmds = coordinator.handle(Msg::FileChanged {
        run_key: key(KEY_A),
    });
    assert_eq!(cmds.len(), 2);
    assert!(matches!(cmds[0], Cmd::LiveDrain { .. }));
    assert!(matches!(cmds[1], Cmd::WaitFileChange { .. }));
}

#[test]
fn file_change_for_an_unknown_run_is_ignored() {
    let (_dir, mut coordinator, _writer) = live_run();
    let cmds = coordinator.handle(Msg::FileChanged {
        run_key: key(KEY_B),
    });
    assert!(cmds.is_empty());
}

#[test]
fn live_append_flows_to_the_view() {
    let (_dir, mut coordinator, mut writer) = live_run();

    writer.append(&history_record(2, &[("loss", "0.8")])).unwrap();
    writer.flush().unwrap();

    let cmds = coordinator.handle(Msg::FileChanged {
        run_key: key(KEY_A),
    });
    pump(&mut coordinator, cmds);

    let appends = coordinator
        .view()
        .calls_for(&key(KEY_A))
        .into_iter()
        .filter(|call| matches!(call, ViewCall::AppendHistory { .. }))
        .count();
    assert_eq!(appends, 2, "boot batch plus live batch");
}

#[test]
fn heartbeat_drains_every_live_selected_run_and_rearms() {
    let (_dir, mut coordinator, _writer) = live_run();

    let cmds = coordinator.handle(Msg::Heartbeat);
    let drains = cmds
        .iter()
        .filter(|c| matches!(c, Cmd::LiveDrain { .. }))
        .count();
    assert_eq!(drains, 1);
    assert!(matches!(cmds.last(), Some(Cmd::WaitHeartbeat { .. })));
}

#[test]
fn heartbeat_with_no_live_runs_stops_quietly() {
    let (_dir, mut coordinator, _writer) = live_run();
    coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_A),
    });
    assert!(!coordinator.has_live_runs());

    let cmds = coordinator.handle(Msg::Heartbeat);
    assert!(cmds.is_empty());
    assert!(!coordinator.heartbeat_running());
}

#[test]
fn live_exit_finishes_the_run_and_releases_the_heartbeat() {
    let (_dir, mut coordinator, mut writer) = live_run();

    writer.append(&exit_record(0)).unwrap();
    writer.flush().unwrap();

    let cmds = coordinator.handle(Msg::FileChanged {
        run_key: key(KEY_A),
    });
    pump(&mut coordinator, cmds);

    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Finished));
    assert!(!coordinator.has_live_runs());
    assert!(!coordinator.heartbeat_running());
    // Exit closed the reader; a stray heartbeat drain finds nothing to do.
    let cmds = coordinator.handle(Msg::Heartbeat);
    assert!(cmds.is_empty());
}

#[test]
fn corrupt_append_fails_the_run_but_not_the_workspace() {
    let (dir, mut coordinator, mut writer) = live_run();
    write_run(dir.path(), KEY_B, &[run_record("bbb222", "other", "p")]);
    let toggles = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });
    // KEY_B is not in run_keys until the next scan picks it up.
    assert!(toggles.is_empty());
    discover(&mut coordinator);
    let toggles = coordinator.handle(Msg::ToggleRunSelected {
        run_key: key(KEY_B),
    });
    pump(&mut coordinator, toggles);
    assert_eq!(coordinator.state_of(&key(KEY_B)), Some(RunState::Live));

    writer
        .append_raw(&runboard_storage::format::encode_frame(b"{bad"))
        .unwrap();
    writer.flush().unwrap();

    let cmds = coordinator.handle(Msg::FileChanged {
        run_key: key(KEY_A),
    });
    pump(&mut coordinator, cmds);

    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Failed));
    assert_eq!(
        coordinator.overview(&key(KEY_A)).unwrap().state,
        RunState::Failed
    );
    // The other run is unaffected and keeps the heartbeat alive.
    assert_eq!(coordinator.state_of(&key(KEY_B)), Some(RunState::Live));
    assert!(coordinator.has_live_runs());
    assert!(coordinator.heartbeat_running());
}
