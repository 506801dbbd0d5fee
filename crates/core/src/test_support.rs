// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::record::{
    ExitRecord, HistoryItem, HistoryRecord, Record, RunRecord, StatsItem, StatsRecord,
    SummaryItem, SummaryRecord,
};

// ── Record factory functions ────────────────────────────────────────────────

pub fn run_record(id: &str, display_name: &str, project: &str) -> Record {
    Record::Run(RunRecord {
        id: id.to_string(),
        display_name: Some(display_name.to_string()),
        project: Some(project.to_string()),
        config: None,
    })
}

pub fn history_item(path: &[&str], value_json: &str) -> HistoryItem {
    HistoryItem {
        key: path.iter().map(|s| s.to_string()).collect(),
        value_json: value_json.to_string(),
    }
}

/// History record with a `_step` item plus flat metric items.
pub fn history_record(step: i64, items: &[(&str, &str)]) -> Record {
    let mut all = vec![history_item(&["_step"], &step.to_string())];
    all.extend(items.iter().map(|(k, v)| history_item(&[k], v)));
    Record::History(HistoryRecord {
        step: None,
        items: all,
    })
}

pub fn stats_record(timestamp: i64, items: &[(&str, &str)]) -> Record {
    Record::Stats(StatsRecord {
        timestamp,
        items: items
            .iter()
            .map(|(k, v)| StatsItem {
                key: k.to_string(),
                value_json: v.to_string(),
            })
            .collect(),
    })
}

pub fn summary_record(updates: &[(&str, &str)]) -> Record {
    Record::Summary(SummaryRecord {
        updates: updates
            .iter()
            .map(|(k, v)| SummaryItem {
                key: vec![k.to_string()],
                value_json: v.to_string(),
            })
            .collect(),
        removes: Vec::new(),
    })
}

pub fn exit_record(exit_code: i32) -> Record {
    Record::Exit(ExitRecord { exit_code })
}
