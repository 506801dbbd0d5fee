// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run tail controller.
//!
//! Owns one [`FramedLogReader`] and the run's exit state, and exposes the
//! two bounded read operations: the boot chunk and the live drain. Both
//! stop at a record budget, a wall-clock budget, an exit record, or a soft
//! EOF, whichever comes first, so a work unit never holds a worker for
//! longer than roughly `max_time` plus one record read.

use crate::decode::decode;
use parking_lot::Mutex;
use runboard_core::metric::merge_metrics;
use runboard_core::{Config, Record, RunMsg};
use runboard_storage::{FramedLogReader, ReadError, ReadOutcome};
use std::path::Path;
use std::time::{Duration, Instant};

/// Bounds for one chunked read.
#[derive(Debug, Clone, Copy)]
pub struct ChunkBudget {
    pub max_records: usize,
    pub max_time: Duration,
}

impl ChunkBudget {
    /// Boot-load budget from configuration.
    pub fn boot(config: &Config) -> Self {
        Self {
            max_records: config.boot_chunk_records,
            max_time: config.boot_chunk_max_time(),
        }
    }

    /// Live-drain budget from configuration.
    pub fn live(config: &Config) -> Self {
        Self {
            max_records: config.live_chunk_records,
            max_time: config.live_chunk_max_time(),
        }
    }
}

/// Result of one boot chunk.
#[derive(Debug)]
pub struct ChunkedBatch {
    /// Decoded messages, with history and summary coalesced per chunk.
    pub msgs: Vec<RunMsg>,
    /// Whether the coordinator must schedule another boot chunk.
    pub has_more: bool,
    /// Records consumed in this chunk.
    pub progress: usize,
}

#[derive(Debug)]
struct TailState {
    exit_seen: bool,
    exit_code: i32,
}

/// Tail of a single run's log.
#[derive(Debug)]
pub struct TailController {
    reader: FramedLogReader,
    state: Mutex<TailState>,
}

impl TailController {
    pub fn new(reader: FramedLogReader) -> Self {
        Self {
            reader,
            state: Mutex::new(TailState {
                exit_seen: false,
                exit_code: 0,
            }),
        }
    }

    /// Open the run log at `path` and wrap it in a controller.
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        Ok(Self::new(FramedLogReader::open(path)?))
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    /// Once true, no further records will be emitted for this run.
    pub fn exit_seen(&self) -> bool {
        self.state.lock().exit_seen
    }

    pub fn exit_code(&self) -> i32 {
        self.state.lock().exit_code
    }

    /// Close the underlying reader. Idempotent.
    pub fn close(&self) {
        self.reader.close();
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_closed()
    }

    /// One boot chunk: read until the budget, an exit record, or a soft EOF.
    pub fn read_all_chunked(&self, budget: &ChunkBudget) -> Result<ChunkedBatch, ReadError> {
        let drained = self.drain(budget)?;
        Ok(ChunkedBatch {
            has_more: !drained.exited && drained.progress > 0 && !drained.soft_eof,
            progress: drained.progress,
            msgs: drained.msgs,
        })
    }

    /// One live drain. Returns `None` when no messages were produced.
    pub fn read_available(&self, budget: &ChunkBudget) -> Result<Option<Vec<RunMsg>>, ReadError> {
        let drained = self.drain(budget)?;
        if drained.msgs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(drained.msgs))
        }
    }

    fn drain(&self, budget: &ChunkBudget) -> Result<Drained, ReadError> {
        let started = Instant::now();
        let mut acc = ChunkAccumulator::default();
        let mut progress = 0usize;
        let mut soft_eof = false;
        let mut exited = self.state.lock().exit_seen;

        while !exited {
            if progress >= budget.max_records {
                break;
            }
            if progress > 0 && started.elapsed() >= budget.max_time {
                break;
            }

            match self.reader.read_next()? {
                ReadOutcome::Eof => {
                    soft_eof = true;
                    break;
                }
                ReadOutcome::Record(record) => {
                    progress += 1;
                    let is_exit = matches!(record, Record::Exit(_));
                    if let Some(msg) = decode(record) {
                        if let RunMsg::FileComplete { exit_code } = msg {
                            let mut state = self.state.lock();
                            if !state.exit_seen {
                                state.exit_seen = true;
                                state.exit_code = exit_code;
                                acc.push(msg);
                            }
                        } else {
                            acc.push(msg);
                        }
                    }
                    if is_exit {
                        exited = true;
                    }
                }
            }
        }

        if exited {
            // No further records after exit; release the file.
            self.reader.close();
        }

        Ok(Drained {
            msgs: acc.msgs,
            progress,
            soft_eof,
            exited,
        })
    }
}

struct Drained {
    msgs: Vec<RunMsg>,
    progress: usize,
    soft_eof: bool,
    exited: bool,
}

/// Coalesces history and summary messages while keeping arrival order for
/// everything else. The merged message sits at its first arrival position.
#[derive(Default)]
struct ChunkAccumulator {
    msgs: Vec<RunMsg>,
    history_at: Option<usize>,
    summary_at: Option<usize>,
}

impl ChunkAccumulator {
    fn push(&mut self, msg: RunMsg) {
        match msg {
            RunMsg::History(metrics) => match self.history_at {
                Some(index) => {
                    if let RunMsg::History(existing) = &mut self.msgs[index] {
                        merge_metrics(existing, metrics);
                    }
                }
                None => {
                    self.history_at = Some(self.msgs.len());
                    self.msgs.push(RunMsg::History(metrics));
                }
            },
            RunMsg::Summary(summary) => match self.summary_at {
                Some(index) => {
                    if let RunMsg::Summary(existing) = &mut self.msgs[index] {
                        existing.updates.extend(summary.updates);
                        existing.removes.extend(summary.removes);
                    }
                }
                None => {
                    self.summary_at = Some(self.msgs.len());
                    self.msgs.push(RunMsg::Summary(summary));
                }
            },
            other => self.msgs.push(other),
        }
    }
}

#[cfg(test)]
#[path = "tail_tests.rs"]
mod tests;
