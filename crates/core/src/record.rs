// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed records decoded from a run log.
//!
//! Frame bodies deserialize with `{"type": "history", ...fields}` tagging.
//! Record kinds the dashboard does not consume decode to [`Record::Unknown`]
//! and are skipped; only the variants here carry meaning.

use serde::{Deserialize, Serialize};

/// One decoded run-log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Run(RunRecord),
    History(HistoryRecord),
    Stats(StatsRecord),
    Summary(SummaryRecord),
    Environment(EnvironmentRecord),
    Exit(ExitRecord),
    /// Any record kind not consumed by the dashboard.
    #[serde(other)]
    Unknown,
}

impl Record {
    /// Record kind for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Record::Run(_) => "run",
            Record::History(_) => "history",
            Record::Stats(_) => "stats",
            Record::Summary(_) => "summary",
            Record::Environment(_) => "environment",
            Record::Exit(_) => "exit",
            Record::Unknown => "unknown",
        }
    }
}

/// Run identity: written once near the start of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Run configuration as a JSON tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// One logged item within a history record.
///
/// `key` is the nested key path; a single-element path carries the full
/// dotted name. `value_json` is the JSON encoding of the scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub key: Vec<String>,
    pub value_json: String,
}

impl HistoryItem {
    /// Nested key path joined with `.`.
    pub fn dotted_key(&self) -> String {
        self.key.join(".")
    }
}

/// Scalar metrics logged at one training step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Writer-assigned step; the `_step` item takes precedence when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

/// One system telemetry sample, keys already flat (`gpu.0.temp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsItem {
    pub key: String,
    pub value_json: String,
}

/// System telemetry sampled at one wall-clock second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Sample time, seconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub items: Vec<StatsItem>,
}

/// One summary tree update (or removal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub key: Vec<String>,
    #[serde(default)]
    pub value_json: String,
}

impl SummaryItem {
    /// Nested key path joined with `.`.
    pub fn dotted_key(&self) -> String {
        self.key.join(".")
    }
}

/// Rolling run summary: latest values plus explicit removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default)]
    pub updates: Vec<SummaryItem>,
    #[serde(default)]
    pub removes: Vec<SummaryItem>,
}

/// Writer environment: host, versions, hardware.
///
/// The dashboard treats everything beyond `writer_id` as an opaque tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    #[serde(default)]
    pub writer_id: String,
    #[serde(default, flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Final record of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub exit_code: i32,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
