// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::metric::Metrics;
use crate::record::{RunRecord, SummaryItem, SummaryRecord};

fn overview() -> RunOverview {
    RunOverview::new(RunKey::new("run-20240315_101500-ab12cd"))
}

#[test]
fn identity_fills_title_fields() {
    let mut ov = overview();
    assert_eq!(ov.title(), "run-20240315_101500-ab12cd");

    ov.apply(&RunMsg::Run(RunRecord {
        id: "ab12cd".to_string(),
        display_name: Some("warm-sunset-7".to_string()),
        project: Some("mnist".to_string()),
        config: None,
    }));
    assert_eq!(ov.title(), "warm-sunset-7");
    assert_eq!(ov.project.as_deref(), Some("mnist"));
}

#[test]
fn later_identity_without_name_keeps_earlier_name() {
    let mut ov = overview();
    ov.apply(&RunMsg::Run(RunRecord {
        id: "ab12cd".to_string(),
        display_name: Some("warm-sunset-7".to_string()),
        project: None,
        config: None,
    }));
    ov.apply(&RunMsg::Run(RunRecord {
        id: "ab12cd".to_string(),
        display_name: None,
        project: None,
        config: None,
    }));
    assert_eq!(ov.title(), "warm-sunset-7");
}

#[test]
fn summary_updates_and_removes() {
    let mut ov = overview();
    ov.apply(&RunMsg::Summary(SummaryRecord {
        updates: vec![
            SummaryItem {
                key: vec!["loss".to_string()],
                value_json: "0.25".to_string(),
            },
            SummaryItem {
                key: vec!["best".to_string(), "acc".to_string()],
                value_json: "0.91".to_string(),
            },
        ],
        removes: Vec::new(),
    }));
    assert_eq!(ov.summary["loss"], 0.25);
    assert_eq!(ov.summary["best.acc"], 0.91);

    ov.apply(&RunMsg::Summary(SummaryRecord {
        updates: Vec::new(),
        removes: vec![SummaryItem {
            key: vec!["loss".to_string()],
            value_json: String::new(),
        }],
    }));
    assert!(!ov.summary.contains_key("loss"));
    assert!(ov.summary.contains_key("best.acc"));
}

#[test]
fn unparseable_summary_value_becomes_null() {
    let mut ov = overview();
    ov.apply(&RunMsg::Summary(SummaryRecord {
        updates: vec![SummaryItem {
            key: vec!["weird".to_string()],
            value_json: "not json".to_string(),
        }],
        removes: Vec::new(),
    }));
    assert_eq!(ov.summary["weird"], serde_json::Value::Null);
}

#[yare::parameterized(
    clean = { 0, RunState::Finished },
    failed = { 1, RunState::Failed },
    signal = { 137, RunState::Failed },
)]
fn exit_code_sets_terminal_state(code: i32, expected: RunState) {
    let mut ov = overview();
    ov.apply(&RunMsg::FileComplete { exit_code: code });
    assert_eq!(ov.state, expected);
    assert_eq!(ov.exit_code, Some(code));
}

#[test]
fn history_and_stats_do_not_touch_overview() {
    let mut ov = overview();
    let before = ov.clone();
    ov.apply(&RunMsg::History(Metrics::new()));
    ov.apply(&RunMsg::Stats {
        epoch_secs: 1,
        metrics: Default::default(),
    });
    assert_eq!(ov, before);
}
