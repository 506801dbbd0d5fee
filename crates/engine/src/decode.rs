// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record to UI-message decoding.
//!
//! Pure functions from [`Record`] to [`RunMsg`]. History extraction joins
//! nested keys with `.`, skips `_`-prefixed keys except `_step` (the X
//! coordinate), strips surrounding quotes from JSON scalar encodings, and
//! drops items that do not parse as `f64`.

use runboard_core::metric::Metrics;
use runboard_core::record::{HistoryRecord, Record, StatsRecord};
use runboard_core::RunMsg;
use std::collections::BTreeMap;

/// Decode one record into a UI message.
///
/// Returns `None` for record kinds the dashboard ignores and for history or
/// stats records with no parseable metrics.
pub fn decode(record: Record) -> Option<RunMsg> {
    match record {
        Record::Run(run) => Some(RunMsg::Run(run)),
        Record::History(history) => decode_history(history),
        Record::Stats(stats) => decode_stats(stats),
        Record::Summary(summary) => Some(RunMsg::Summary(summary)),
        Record::Environment(env) => Some(RunMsg::SystemInfo(env)),
        Record::Exit(exit) => Some(RunMsg::FileComplete {
            exit_code: exit.exit_code,
        }),
        Record::Unknown => None,
    }
}

fn decode_history(history: HistoryRecord) -> Option<RunMsg> {
    let mut step = history.step.map(|s| s as f64);
    for item in &history.items {
        if item.key.len() == 1 && item.key[0] == "_step" {
            if let Some(parsed) = parse_step(&item.value_json) {
                step = Some(parsed);
            }
        }
    }
    let step = step?;

    let mut metrics = Metrics::new();
    for item in history.items {
        let key = item.dotted_key();
        if key.starts_with('_') {
            continue;
        }
        let Some(value) = parse_scalar(&item.value_json) else {
            continue;
        };
        metrics
            .entry(key)
            .or_default()
            .push(step, value);
    }

    if metrics.is_empty() {
        None
    } else {
        Some(RunMsg::History(metrics))
    }
}

fn decode_stats(stats: StatsRecord) -> Option<RunMsg> {
    let mut metrics = BTreeMap::new();
    for item in stats.items {
        if item.key.starts_with('_') {
            continue;
        }
        if let Some(value) = parse_scalar(&item.value_json) {
            metrics.insert(item.key, value);
        }
    }

    if metrics.is_empty() {
        None
    } else {
        Some(RunMsg::Stats {
            epoch_secs: stats.timestamp,
            metrics,
        })
    }
}

/// Parse a JSON-encoded scalar, stripping surrounding quotes first so both
/// `0.42` and `"0.42"` yield a value.
fn parse_scalar(value_json: &str) -> Option<f64> {
    let trimmed = value_json.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `_step` is an integer on the wire but charts use `f64` X coordinates.
fn parse_step(value_json: &str) -> Option<f64> {
    parse_scalar(value_json).map(f64::trunc)
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
