// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loop-level messages and work units.
//!
//! Every coordinator handler consumes one [`Msg`] and returns [`Cmd`] work
//! units; the executor turns each unit back into at most one message. All
//! run-scoped messages carry their [`RunKey`] so handlers route without a
//! global map.

use crate::heartbeat::HeartbeatTimer;
use crate::tail::{ChunkBudget, ChunkedBatch, TailController};
use runboard_adapters::FileWatcher;
use runboard_core::record::RunRecord;
use runboard_core::{RunKey, RunMsg};
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of an overview preload.
#[derive(Debug, Clone, PartialEq)]
pub enum PreloadResult {
    /// The identity record found in the scanned prefix.
    Identity(RunRecord),
    /// No identity yet: missing file, short log, or identity-free prefix.
    /// Normal for a run that just started; never escalated.
    NotFound,
    /// The log is unreadable; logged but the preload still completes.
    Failed(String),
}

/// A message entering the UI loop.
#[derive(Debug)]
pub enum Msg {
    /// Result of a directory scan. `err` set means the listing is unusable
    /// and the previous run list stays.
    RunDirs {
        run_keys: Vec<RunKey>,
        err: Option<String>,
    },
    /// A reader finished initializing for a selected run.
    ReaderInit {
        run_key: RunKey,
        tail: Arc<TailController>,
    },
    /// One boot chunk completed.
    ChunkedBatch {
        run_key: RunKey,
        batch: ChunkedBatch,
    },
    /// One live drain produced records.
    Batch {
        run_key: RunKey,
        msgs: Vec<RunMsg>,
    },
    /// The run's log file changed on disk.
    FileChanged { run_key: RunKey },
    /// Shared heartbeat expired with live runs present.
    Heartbeat,
    /// An overview preload completed (success or failure).
    OverviewPreloaded {
        run_key: RunKey,
        result: PreloadResult,
    },
    /// Unrecoverable reader error; the run is marked failed.
    RunFailed { run_key: RunKey, error: String },
    /// User toggled a run's selection.
    ToggleRunSelected { run_key: RunKey },
    /// User pinned a run (selecting it first if needed).
    PinRun { run_key: RunKey },
    /// Shut the workspace down.
    Quit,
}

impl Msg {
    /// Message kind for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::RunDirs { .. } => "run_dirs",
            Msg::ReaderInit { .. } => "reader_init",
            Msg::ChunkedBatch { .. } => "chunked_batch",
            Msg::Batch { .. } => "batch",
            Msg::FileChanged { .. } => "file_changed",
            Msg::Heartbeat => "heartbeat",
            Msg::OverviewPreloaded { .. } => "overview_preloaded",
            Msg::RunFailed { .. } => "run_failed",
            Msg::ToggleRunSelected { .. } => "toggle_run_selected",
            Msg::PinRun { .. } => "pin_run",
            Msg::Quit => "quit",
        }
    }

    /// The run this message is scoped to, if any.
    pub fn run_key(&self) -> Option<&RunKey> {
        match self {
            Msg::ReaderInit { run_key, .. }
            | Msg::ChunkedBatch { run_key, .. }
            | Msg::Batch { run_key, .. }
            | Msg::FileChanged { run_key }
            | Msg::OverviewPreloaded { run_key, .. }
            | Msg::RunFailed { run_key, .. }
            | Msg::ToggleRunSelected { run_key }
            | Msg::PinRun { run_key } => Some(run_key),
            Msg::RunDirs { .. } | Msg::Heartbeat | Msg::Quit => None,
        }
    }
}

/// A work unit returned by a handler.
///
/// Units are the only suspension points: each is bounded by a record count
/// or a wall-clock budget and produces at most one message.
#[derive(Debug)]
pub enum Cmd {
    /// Scan the workspace root for run directories, optionally after a
    /// poll delay.
    ScanRunDirs {
        root: PathBuf,
        delay: Option<std::time::Duration>,
    },
    /// Open a reader for a newly selected run.
    InitReader { run_key: RunKey, path: PathBuf },
    /// Run one boot chunk.
    BootChunk {
        run_key: RunKey,
        tail: Arc<TailController>,
        budget: ChunkBudget,
    },
    /// Run one live drain.
    LiveDrain {
        run_key: RunKey,
        tail: Arc<TailController>,
        budget: ChunkBudget,
    },
    /// Block on the run's watcher until its file changes (one-shot).
    WaitFileChange {
        run_key: RunKey,
        watcher: Arc<FileWatcher>,
    },
    /// Block until the shared heartbeat expires (one-shot).
    WaitHeartbeat { timer: Arc<HeartbeatTimer> },
    /// Read a run's identity for the overview list.
    Preload { run_key: RunKey, path: PathBuf },
}

impl Cmd {
    /// Work-unit name for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::ScanRunDirs { .. } => "scan_run_dirs",
            Cmd::InitReader { .. } => "init_reader",
            Cmd::BootChunk { .. } => "boot_chunk",
            Cmd::LiveDrain { .. } => "live_drain",
            Cmd::WaitFileChange { .. } => "wait_file_change",
            Cmd::WaitHeartbeat { .. } => "wait_heartbeat",
            Cmd::Preload { .. } => "preload",
        }
    }

    /// Key-value pairs for structured logging.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Cmd::ScanRunDirs { root, delay } => {
                let mut fields = vec![("root", root.display().to_string())];
                if let Some(delay) = delay {
                    fields.push(("delay_ms", delay.as_millis().to_string()));
                }
                fields
            }
            Cmd::InitReader { run_key, path } => vec![
                ("run_key", run_key.to_string()),
                ("path", path.display().to_string()),
            ],
            Cmd::BootChunk {
                run_key, budget, ..
            }
            | Cmd::LiveDrain {
                run_key, budget, ..
            } => vec![
                ("run_key", run_key.to_string()),
                ("max_records", budget.max_records.to_string()),
                ("max_time_ms", budget.max_time.as_millis().to_string()),
            ],
            Cmd::WaitFileChange { run_key, .. } => vec![("run_key", run_key.to_string())],
            Cmd::WaitHeartbeat { timer } => {
                vec![("interval_ms", timer.interval().as_millis().to_string())]
            }
            Cmd::Preload { run_key, path } => vec![
                ("run_key", run_key.to_string()),
                ("path", path.display().to_string()),
            ],
        }
    }
}
