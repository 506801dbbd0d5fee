// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

#[yare::parameterized(
    online = { "run-20240315_101500-ab12cd", Some("20240315_101500"), Some("ab12cd") },
    offline = { "offline-run-20240315_101500-ab12cd", Some("20240315_101500"), Some("ab12cd") },
    id_with_dash = { "run-20240315_101500-a-b", Some("20240315_101500"), Some("b") },
    no_prefix = { "checkpoint-20240315_101500-x", None, Some("x") },
    truncated = { "run-20240315", None, Some("20240315") },
    missing_id = { "run-20240315_101500", None, Some("20240315_101500") },
)]
fn key_parsing(key: &str, timestamp: Option<&str>, run_id: Option<&str>) {
    let key = RunKey::new(key);
    assert_eq!(key.timestamp(), timestamp);
    assert_eq!(key.run_id(), run_id);
}

#[test]
fn log_path_joins_root_key_and_id() {
    let key = RunKey::new("run-20240315_101500-ab12cd");
    let path = key.log_path(Path::new("/tmp/wandb")).unwrap();
    assert_eq!(
        path,
        Path::new("/tmp/wandb/run-20240315_101500-ab12cd/run-ab12cd.wandb")
    );
}

#[test]
fn display_sort_is_newest_first_with_key_tiebreak() {
    let mut keys = vec![
        RunKey::new("run-20240101_000000-old"),
        RunKey::new("run-20240301_000000-bbb"),
        RunKey::new("run-20240301_000000-aaa"),
        RunKey::new("offline-run-20240401_000000-off"),
    ];
    sort_for_display(&mut keys);
    let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "offline-run-20240401_000000-off",
            "run-20240301_000000-aaa",
            "run-20240301_000000-bbb",
            "run-20240101_000000-old",
        ]
    );
}

#[test]
fn keys_without_timestamp_sort_last() {
    let mut keys = vec![
        RunKey::new("zzz-not-a-run"),
        RunKey::new("run-20240101_000000-abc"),
    ];
    sort_for_display(&mut keys);
    assert_eq!(keys[0].as_str(), "run-20240101_000000-abc");
}

#[test]
fn state_predicates() {
    assert!(RunState::Live.is_live());
    assert!(!RunState::Booting.is_live());
    assert!(RunState::Booting.is_active());
    assert!(!RunState::Failed.is_active());
    assert_eq!(RunState::Finished.label(), "finished");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Sorting must be a total order: no panic, stable result on any input.
        #[test]
        fn display_sort_never_panics(raw in proptest::collection::vec("[a-z0-9_-]{0,40}", 0..20)) {
            let mut keys: Vec<RunKey> = raw.into_iter().map(RunKey::new).collect();
            sort_for_display(&mut keys);
            let mut again = keys.clone();
            sort_for_display(&mut again);
            prop_assert_eq!(keys, again);
        }
    }
}
