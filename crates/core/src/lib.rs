// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runboard-core: value types shared across the runboard workspace.
//!
//! Everything here is plain data: run identity, decoded log records, the
//! UI-level messages the decoder produces, metric series, and configuration.
//! I/O lives in the storage, adapters, and engine crates.

pub mod config;
pub mod id;
pub mod message;
pub mod metric;
pub mod overview;
pub mod record;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ColorMode, Config, ConfigError};
pub use id::ShortId;
pub use message::RunMsg;
pub use metric::{merge_metrics, MetricSeries, Metrics};
pub use overview::RunOverview;
pub use record::{
    EnvironmentRecord, ExitRecord, HistoryItem, HistoryRecord, Record, RunRecord, StatsItem,
    StatsRecord, SummaryItem, SummaryRecord,
};
pub use run::{RunKey, RunState};
