// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow interface between the coordinator and the renderer.
//!
//! The coordinator owns all run state and drives the renderer one way
//! through these operations; the renderer never calls back in. Chart
//! drawing and input handling live entirely behind this trait.

use runboard_core::{Metrics, RunKey, RunOverview};
use std::collections::BTreeMap;

/// Rendering operations the ingestion core needs.
pub trait RunView {
    /// Replace the overview shown for a run.
    fn set_run_overview(&mut self, overview: &RunOverview);

    /// Append merged history series for a run's charts.
    fn append_history(&mut self, run_key: &RunKey, metrics: &Metrics);

    /// Append one system telemetry sample.
    fn append_stats(&mut self, run_key: &RunKey, epoch_secs: i64, metrics: &BTreeMap<String, f64>);

    /// Draw this run's series on top of the others.
    fn promote_series_to_top(&mut self, run_key: &RunKey);

    /// Drop a deselected run's series.
    fn remove_series(&mut self, run_key: &RunKey);
}
