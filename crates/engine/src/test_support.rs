// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::view::RunView;
use runboard_core::{Metrics, RunKey, RunOverview, RunState};
use std::collections::BTreeMap;

/// One recorded call on a [`FakeView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    SetOverview { run_key: RunKey, state: RunState },
    AppendHistory { run_key: RunKey, metrics: usize },
    AppendStats { run_key: RunKey, metrics: usize },
    PromoteSeriesToTop { run_key: RunKey },
    RemoveSeries { run_key: RunKey },
}

/// View that records every operation for verification.
#[derive(Debug, Default)]
pub struct FakeView {
    pub calls: Vec<ViewCall>,
}

impl FakeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls_for(&self, run_key: &RunKey) -> Vec<&ViewCall> {
        self.calls
            .iter()
            .filter(|call| match call {
                ViewCall::SetOverview { run_key: k, .. }
                | ViewCall::AppendHistory { run_key: k, .. }
                | ViewCall::AppendStats { run_key: k, .. }
                | ViewCall::PromoteSeriesToTop { run_key: k }
                | ViewCall::RemoveSeries { run_key: k } => k == run_key,
            })
            .collect()
    }

    pub fn removed(&self, run_key: &RunKey) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, ViewCall::RemoveSeries { run_key: k } if k == run_key))
    }

    pub fn promoted(&self, run_key: &RunKey) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, ViewCall::PromoteSeriesToTop { run_key: k } if k == run_key))
    }
}

impl RunView for FakeView {
    fn set_run_overview(&mut self, overview: &RunOverview) {
        self.calls.push(ViewCall::SetOverview {
            run_key: overview.run_key.clone(),
            state: overview.state,
        });
    }

    fn append_history(&mut self, run_key: &RunKey, metrics: &Metrics) {
        self.calls.push(ViewCall::AppendHistory {
            run_key: run_key.clone(),
            metrics: metrics.len(),
        });
    }

    fn append_stats(
        &mut self,
        run_key: &RunKey,
        _epoch_secs: i64,
        metrics: &BTreeMap<String, f64>,
    ) {
        self.calls.push(ViewCall::AppendStats {
            run_key: run_key.clone(),
            metrics: metrics.len(),
        });
    }

    fn promote_series_to_top(&mut self, run_key: &RunKey) {
        self.calls.push(ViewCall::PromoteSeriesToTop {
            run_key: run_key.clone(),
        });
    }

    fn remove_series(&mut self, run_key: &RunKey) {
        self.calls.push(ViewCall::RemoveSeries {
            run_key: run_key.clone(),
        });
    }
}
