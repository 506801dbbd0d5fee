// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metric series storage.
//!
//! A [`MetricSeries`] holds parallel X/Y vectors for one chart line within
//! one run. X is monotonically non-decreasing because `_step` values arrive
//! in file order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parallel X/Y samples for one metric. `x.len() == y.len()` always.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series with a single sample.
    pub fn single(x: f64, y: f64) -> Self {
        Self {
            x: vec![x],
            y: vec![y],
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    /// Append another series in arrival order.
    pub fn extend(&mut self, other: MetricSeries) {
        self.x.extend(other.x);
        self.y.extend(other.y);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Last sample, if any.
    pub fn last(&self) -> Option<(f64, f64)> {
        match (self.x.last(), self.y.last()) {
            (Some(&x), Some(&y)) => Some((x, y)),
            _ => None,
        }
    }
}

/// Metric name to series, ordered by name for stable display.
pub type Metrics = BTreeMap<String, MetricSeries>;

/// Merge `from` into `into`, concatenating series in arrival order.
pub fn merge_metrics(into: &mut Metrics, from: Metrics) {
    for (key, series) in from {
        into.entry(key).or_default().extend(series);
    }
}

#[cfg(test)]
#[path = "metric_tests.rs"]
mod tests;
