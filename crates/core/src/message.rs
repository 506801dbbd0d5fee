// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI-level messages produced by the record decoder.
//!
//! One [`RunMsg`] corresponds to one decoded record, except `History`, which
//! the tail controller coalesces across a whole chunk before delivery.

use crate::metric::Metrics;
use crate::record::{EnvironmentRecord, RunRecord, SummaryRecord};
use std::collections::BTreeMap;

/// A message scoped to a single run, consumed by the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMsg {
    /// Run identity arrived.
    Run(RunRecord),
    /// Scalar history, merged per metric key.
    History(Metrics),
    /// One system telemetry sample.
    Stats {
        epoch_secs: i64,
        metrics: BTreeMap<String, f64>,
    },
    /// Summary tree updates and removals.
    Summary(SummaryRecord),
    /// Writer environment.
    SystemInfo(EnvironmentRecord),
    /// The run wrote its exit record; no further records follow.
    FileComplete { exit_code: i32 },
}

impl RunMsg {
    /// Message kind for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            RunMsg::Run(_) => "run",
            RunMsg::History(_) => "history",
            RunMsg::Stats { .. } => "stats",
            RunMsg::Summary(_) => "summary",
            RunMsg::SystemInfo(_) => "system_info",
            RunMsg::FileComplete { .. } => "file_complete",
        }
    }

    /// One-line summary for structured logging.
    pub fn log_summary(&self) -> String {
        match self {
            RunMsg::Run(run) => format!("run id={}", run.id),
            RunMsg::History(metrics) => format!("history metrics={}", metrics.len()),
            RunMsg::Stats { metrics, .. } => format!("stats metrics={}", metrics.len()),
            RunMsg::Summary(summary) => format!(
                "summary updates={} removes={}",
                summary.updates.len(),
                summary.removes.len()
            ),
            RunMsg::SystemInfo(env) => format!("system_info writer={}", env.writer_id),
            RunMsg::FileComplete { exit_code } => format!("file_complete exit_code={exit_code}"),
        }
    }
}
