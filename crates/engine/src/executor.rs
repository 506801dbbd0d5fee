// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work-unit executor.
//!
//! Spawns each [`Cmd`] onto the tokio runtime and feeds its result message
//! back into the loop's bounded channel. A unit that produces nothing (a
//! finished watcher wait, a drain that raced a closed reader) simply ends.

use crate::msg::{Cmd, Msg, PreloadResult};
use crate::preload::preload_overview;
use runboard_adapters::scan_run_dirs;
use runboard_storage::ReadError;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Dispatches work units; cheap to clone alongside its sender.
#[derive(Clone)]
pub struct Executor {
    tx: mpsc::Sender<Msg>,
}

impl Executor {
    pub fn new(tx: mpsc::Sender<Msg>) -> Self {
        Self { tx }
    }

    /// Spawn one work unit.
    pub fn dispatch(&self, cmd: Cmd) {
        let tx = self.tx.clone();
        let span = tracing::debug_span!("work_unit", unit = cmd.name());
        tokio::spawn(
            async move {
                if let Some(msg) = run_cmd(cmd).await {
                    // The loop consumes from a bounded channel; send blocks
                    // when it falls behind, which is the backpressure we want.
                    let _ = tx.send(msg).await;
                }
            }
            .instrument(span),
        );
    }

    /// Spawn every unit in order.
    pub fn dispatch_all(&self, cmds: Vec<Cmd>) {
        for cmd in cmds {
            self.dispatch(cmd);
        }
    }
}

/// Execute one work unit, returning its follow-up message.
pub async fn run_cmd(cmd: Cmd) -> Option<Msg> {
    tracing::debug!(unit = cmd.name(), fields = ?cmd.fields(), "running work unit");

    match cmd {
        Cmd::ScanRunDirs { root, delay } => {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match scan_run_dirs(&root) {
                Ok(run_keys) => Some(Msg::RunDirs {
                    run_keys,
                    err: None,
                }),
                Err(err) => Some(Msg::RunDirs {
                    run_keys: Vec::new(),
                    err: Some(err.to_string()),
                }),
            }
        }

        Cmd::InitReader { run_key, path } => {
            match crate::tail::TailController::open(&path) {
                Ok(tail) => Some(Msg::ReaderInit {
                    run_key,
                    tail: std::sync::Arc::new(tail),
                }),
                Err(err) => Some(Msg::RunFailed {
                    run_key,
                    error: err.to_string(),
                }),
            }
        }

        Cmd::BootChunk {
            run_key,
            tail,
            budget,
        } => match tail.read_all_chunked(&budget) {
            Ok(batch) => Some(Msg::ChunkedBatch { run_key, batch }),
            // The run was deselected while this unit was in flight.
            Err(ReadError::Closed) => None,
            Err(err) => Some(Msg::RunFailed {
                run_key,
                error: err.to_string(),
            }),
        },

        Cmd::LiveDrain {
            run_key,
            tail,
            budget,
        } => match tail.read_available(&budget) {
            Ok(Some(msgs)) => Some(Msg::Batch { run_key, msgs }),
            // An empty drain is normal: the watcher fired before the
            // writer's bytes hit the file.
            Ok(None) => None,
            Err(ReadError::Closed) => None,
            Err(err) => Some(Msg::RunFailed {
                run_key,
                error: err.to_string(),
            }),
        },

        Cmd::WaitFileChange { run_key, watcher } => watcher
            .wait_for_msg()
            .await
            .map(|()| Msg::FileChanged { run_key }),

        Cmd::WaitHeartbeat { timer } => timer.wait().await.then_some(Msg::Heartbeat),

        Cmd::Preload { run_key, path } => {
            let result = preload_overview(&path);
            if let PreloadResult::Failed(error) = &result {
                tracing::warn!(%run_key, error = %error, "overview preload failed");
            }
            Some(Msg::OverviewPreloaded { run_key, result })
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
