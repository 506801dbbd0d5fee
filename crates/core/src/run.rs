// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identity and lifecycle state.
//!
//! A run is one training/experiment session, represented on disk by a
//! directory named `run-YYYYMMDD_HHMMSS-<id>` (or the `offline-run-` variant)
//! containing a single append-only log file `run-<id>.wandb`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

crate::define_id! {
    /// Directory name of a run, unique within one workspace root.
    ///
    /// Equality is byte-exact. Display order is embedded timestamp
    /// descending, tie-broken by key ascending.
    pub struct RunKey;
}

/// Length of the `YYYYMMDD_HHMMSS` timestamp embedded in a run key.
const TIMESTAMP_LEN: usize = 15;

impl RunKey {
    /// The `YYYYMMDD_HHMMSS` portion of the key, if the key is well formed.
    pub fn timestamp(&self) -> Option<&str> {
        let rest = self
            .0
            .strip_prefix("offline-run-")
            .or_else(|| self.0.strip_prefix("run-"))?;
        if rest.len() <= TIMESTAMP_LEN || rest.as_bytes()[TIMESTAMP_LEN] != b'-' {
            return None;
        }
        Some(&rest[..TIMESTAMP_LEN])
    }

    /// The run id suffix: the substring after the last `-`.
    pub fn run_id(&self) -> Option<&str> {
        let id = self.0.rsplit('-').next()?;
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// Path of the run's log file under `root`: `<root>/<key>/run-<id>.wandb`.
    pub fn log_path(&self, root: &Path) -> Option<PathBuf> {
        let id = self.run_id()?;
        Some(root.join(self.as_str()).join(format!("run-{id}.wandb")))
    }

    /// Display ordering: timestamp descending, then key ascending.
    ///
    /// Keys without a parseable timestamp sort after all keys with one.
    pub fn display_cmp(&self, other: &RunKey) -> Ordering {
        match (self.timestamp(), other.timestamp()) {
            (Some(a), Some(b)) => b.cmp(a).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

/// Sort run keys for display: newest first, key ascending on ties.
pub fn sort_for_display(keys: &mut [RunKey]) {
    keys.sort_by(|a, b| a.display_cmp(b));
}

/// Lifecycle of a tailed run.
///
/// `Booting` covers the repeated boot chunks after selection; `Live` begins
/// once a boot chunk drains to a soft EOF without an exit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    New,
    Booting,
    Live,
    Finished,
    Failed,
    Closed,
}

impl RunState {
    /// True while the run's log may still grow and is being followed.
    pub fn is_live(self) -> bool {
        matches!(self, RunState::Live)
    }

    /// True for states with an open reader.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::New | RunState::Booting | RunState::Live)
    }

    /// Short status label for list views.
    pub fn label(self) -> &'static str {
        match self {
            RunState::New => "new",
            RunState::Booting => "booting",
            RunState::Live => "live",
            RunState::Finished => "finished",
            RunState::Failed => "failed",
            RunState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
