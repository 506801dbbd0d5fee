// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn first_discovery_auto_selects_the_most_recent_run_once() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[run_record("aaa111", "newest", "p")]);
    write_run(dir.path(), KEY_B, &[run_record("bbb222", "older", "p")]);

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);

    assert_eq!(coordinator.selected().len(), 1);
    assert!(coordinator.selected().contains(&key(KEY_A)));

    // A newer run appearing later must not be auto-selected.
    let newer = "run-20250101_000000-ddd444";
    write_run(dir.path(), newer, &[run_record("ddd444", "newer", "p")]);
    discover(&mut coordinator);
    assert_eq!(coordinator.run_keys()[0], key(newer));
    assert!(!coordinator.selected().contains(&key(newer)));
}

#[test]
fn preferred_run_beats_the_most_recent() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[run_record("aaa111", "newest", "p")]);
    write_run(dir.path(), KEY_B, &[run_record("bbb222", "older", "p")]);

    let opts = WorkspaceOptions {
        preferred_run: Some(key(KEY_B)),
        ..WorkspaceOptions::new(dir.path().to_path_buf(), Config::default())
    };
    let mut coordinator = coordinator_with(dir.path(), opts);
    discover(&mut coordinator);

    assert!(coordinator.selected().contains(&key(KEY_B)));
    assert!(!coordinator.selected().contains(&key(KEY_A)));
}

#[test]
fn select_all_selects_every_discovered_run() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[exit_record(0)]);
    write_run(dir.path(), KEY_B, &[exit_record(0)]);
    write_run(dir.path(), KEY_C, &[exit_record(0)]);

    let opts = WorkspaceOptions {
        follow: false,
        select_all: true,
        ..WorkspaceOptions::new(dir.path().to_path_buf(), Config::default())
    };
    let mut coordinator = coordinator_with(dir.path(), opts);
    discover(&mut coordinator);

    assert_eq!(coordinator.selected().len(), 3);
    for name in [KEY_A, KEY_B, KEY_C] {
        assert_eq!(coordinator.state_of(&key(name)), Some(RunState::Finished));
    }
}

#[test]
fn disappeared_run_drops_all_state() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[history_record(1, &[("loss", "0.5")])]);

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);
    assert_eq!(coordinator.state_of(&key(KEY_A)), Some(RunState::Live));

    std::fs::remove_dir_all(dir.path().join(KEY_A)).unwrap();
    discover(&mut coordinator);

    assert!(coordinator.run_keys().is_empty());
    assert!(coordinator.selected().is_empty());
    assert_eq!(coordinator.state_of(&key(KEY_A)), None);
    assert_eq!(coordinator.overview(&key(KEY_A)), None);
    assert_eq!(coordinator.pinned(), None);
    assert!(!coordinator.has_live_runs());
    assert!(!coordinator.heartbeat_running());
    assert!(coordinator.view().removed(&key(KEY_A)));
}

#[test]
fn scan_error_keeps_the_previous_list_and_continues_polling() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[exit_record(0)]);

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);
    assert_eq!(coordinator.run_keys().len(), 1);

    let cmds = coordinator.handle(Msg::RunDirs {
        run_keys: Vec::new(),
        err: Some("permission denied".to_string()),
    });
    assert_eq!(coordinator.run_keys().len(), 1, "list must survive a failed scan");
    assert!(
        matches!(cmds.last(), Some(Cmd::ScanRunDirs { delay: Some(_), .. })),
        "polling continues after a scan error"
    );
}

#[test]
fn unselected_runs_get_preloaded_overviews() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), KEY_A, &[run_record("aaa111", "newest", "p")]);
    write_run(dir.path(), KEY_B, &[run_record("bbb222", "older-name", "p")]);
    write_run(dir.path(), KEY_C, &[history_record(1, &[("loss", "1.0")])]);

    let mut coordinator = coordinator(dir.path());
    discover(&mut coordinator);

    // KEY_B's identity arrived through the preloader.
    let overview = coordinator.overview(&key(KEY_B)).unwrap();
    assert_eq!(overview.title(), "older-name");

    // KEY_C has no identity in its prefix: not escalated, key still listed.
    let overview = coordinator.overview(&key(KEY_C)).unwrap();
    assert_eq!(overview.id, None);
    assert_eq!(overview.title(), KEY_C);
}

#[test]
fn preload_cap_is_respected_while_pumping() {
    let dir = TempDir::new().unwrap();
    let mut names = Vec::new();
    for n in 0..9 {
        let name = format!("run-20240101_00000{n}-id{n}00");
        write_run(dir.path(), &name, &[run_record(&format!("id{n}00"), "x", "p")]);
        names.push(name);
    }

    let mut config = Config::default();
    config.max_concurrent_preloads = 2;
    let mut coordinator = coordinator_with(
        dir.path(),
        WorkspaceOptions::new(dir.path().to_path_buf(), config),
    );

    // Drive discovery manually so in-flight counts are observable.
    let keys: Vec<RunKey> = names.iter().map(|n| key(n)).collect();
    let mut queue: VecDeque<Cmd> = coordinator
        .handle(Msg::RunDirs {
            run_keys: keys,
            err: None,
        })
        .into();
    let mut max_preloads_queued = 0usize;
    while let Some(cmd) = queue.pop_front() {
        let preloads = queue
            .iter()
            .chain(std::iter::once(&cmd))
            .filter(|c| matches!(c, Cmd::Preload { .. }))
            .count();
        max_preloads_queued = max_preloads_queued.max(preloads);
        if let Some(msg) = exec(cmd) {
            queue.extend(coordinator.handle(msg));
        }
    }
    assert!(
        max_preloads_queued <= 2,
        "at most max_concurrent_preloads in flight, saw {max_preloads_queued}"
    );

    // Every unselected run ended up with an identity.
    for name in names.iter().skip(1) {
        assert!(coordinator.overview(&key(name)).unwrap().id.is_some(), "{name}");
    }
}
