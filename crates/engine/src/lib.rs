// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runboard-engine: the ingestion and liveness pipeline.
//!
//! Turns one or many concurrently-written run logs into an ordered, chunked
//! message stream consumed by a single-threaded UI loop. Handlers on the
//! [`WorkspaceCoordinator`] never block; they mutate coordinator state and
//! return [`Cmd`] work units which the [`Executor`] runs on the tokio
//! runtime, each feeding at most one [`Msg`] back into the loop's channel.

pub mod decode;
pub mod executor;
pub mod heartbeat;
pub mod msg;
pub mod preload;
pub mod tail;
pub mod view;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use decode::decode;
pub use executor::Executor;
pub use heartbeat::HeartbeatTimer;
pub use msg::{Cmd, Msg, PreloadResult};
pub use preload::{preload_overview, OverviewPreloader, PRELOAD_SCAN_RECORDS};
pub use tail::{ChunkBudget, ChunkedBatch, TailController};
pub use view::RunView;
pub use workspace::{WorkspaceCoordinator, WorkspaceOptions};

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{FakeView, ViewCall};

/// Capacity of the loop's message channel.
pub const MSG_CHANNEL_CAPACITY: usize = 4096;
