// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rolling per-run overview.
//!
//! Accumulates identity, config, summary, and environment from decoded
//! messages. Owned by the workspace coordinator; the view reads it through
//! the narrow `RunView` interface and never mutates it.

use crate::message::RunMsg;
use crate::record::EnvironmentRecord;
use crate::run::{RunKey, RunState};
use indexmap::IndexMap;

/// Identity plus rolling config/summary/environment for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOverview {
    pub run_key: RunKey,
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub project: Option<String>,
    pub config: Option<serde_json::Value>,
    /// Latest summary values by dotted key, in arrival order.
    pub summary: IndexMap<String, serde_json::Value>,
    pub environment: Option<EnvironmentRecord>,
    pub state: RunState,
    pub exit_code: Option<i32>,
}

impl RunOverview {
    pub fn new(run_key: RunKey) -> Self {
        Self {
            run_key,
            id: None,
            display_name: None,
            project: None,
            config: None,
            summary: IndexMap::new(),
            environment: None,
            state: RunState::New,
            exit_code: None,
        }
    }

    /// Name to show in list views: display name, else id, else the key.
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_else(|| self.run_key.as_str())
    }

    /// Fold one decoded message into the overview.
    ///
    /// History and stats carry chart data, not overview state; they are
    /// ignored here and routed to the view separately.
    pub fn apply(&mut self, msg: &RunMsg) {
        match msg {
            RunMsg::Run(run) => {
                self.id = Some(run.id.clone());
                if run.display_name.is_some() {
                    self.display_name = run.display_name.clone();
                }
                if run.project.is_some() {
                    self.project = run.project.clone();
                }
                if run.config.is_some() {
                    self.config = run.config.clone();
                }
            }
            RunMsg::Summary(summary) => {
                for item in &summary.updates {
                    let value = serde_json::from_str(&item.value_json)
                        .unwrap_or(serde_json::Value::Null);
                    self.summary.insert(item.dotted_key(), value);
                }
                for item in &summary.removes {
                    self.summary.shift_remove(&item.dotted_key());
                }
            }
            RunMsg::SystemInfo(env) => {
                self.environment = Some(env.clone());
            }
            RunMsg::FileComplete { exit_code } => {
                self.exit_code = Some(*exit_code);
                self.state = if *exit_code == 0 {
                    RunState::Finished
                } else {
                    RunState::Failed
                };
            }
            RunMsg::History(_) | RunMsg::Stats { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "overview_tests.rs"]
mod tests;
