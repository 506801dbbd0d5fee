// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-concurrency overview preloading.
//!
//! Unselected runs get their identity record read ahead of selection so the
//! run list can show names and projects. [`OverviewPreloader`] is the pure
//! FIFO bookkeeping (pending, in-flight, cap); [`preload_overview`] is the
//! work unit that scans the first few records of a log.

use crate::msg::PreloadResult;
use runboard_core::{Record, RunKey};
use runboard_storage::{FramedLogReader, ReadError, ReadOutcome};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// How many records to scan for the identity record before giving up.
pub const PRELOAD_SCAN_RECORDS: usize = 10;

/// FIFO queue of runs awaiting an overview preload, with an in-flight cap.
#[derive(Debug)]
pub struct OverviewPreloader {
    max_in_flight: usize,
    pending: VecDeque<RunKey>,
    queued: HashSet<RunKey>,
    in_flight: HashSet<RunKey>,
}

impl OverviewPreloader {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Queue a run for preloading. No-op if already pending or in flight.
    pub fn enqueue(&mut self, run_key: RunKey) {
        if self.queued.contains(&run_key) || self.in_flight.contains(&run_key) {
            return;
        }
        self.queued.insert(run_key.clone());
        self.pending.push_back(run_key);
    }

    /// Drop queued (not in-flight) keys absent from `present`.
    pub fn drop_queued_not_present(&mut self, present: &HashSet<RunKey>) {
        self.pending.retain(|key| {
            let keep = present.contains(key);
            if !keep {
                self.queued.remove(key);
            }
            keep
        });
    }

    /// Promote up to `max_in_flight - in_flight` pending keys to in-flight
    /// and return them for dispatch.
    pub fn dequeue_startable(&mut self) -> Vec<RunKey> {
        let mut startable = Vec::new();
        while self.in_flight.len() < self.max_in_flight {
            let Some(key) = self.pending.pop_front() else {
                break;
            };
            self.queued.remove(&key);
            self.in_flight.insert(key.clone());
            startable.push(key);
        }
        startable
    }

    /// Record completion of a preload, success or failure.
    pub fn mark_done(&mut self, run_key: &RunKey) {
        self.in_flight.remove(run_key);
        if self.queued.remove(run_key) {
            self.pending.retain(|key| key != run_key);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Read up to [`PRELOAD_SCAN_RECORDS`] records looking for the run identity.
///
/// A missing or not-yet-ready log and an identity-free prefix both yield
/// [`PreloadResult::NotFound`]; those are normal for a run that just
/// started and are not escalated. Anything else is a failure worth logging.
pub fn preload_overview(path: &Path) -> PreloadResult {
    let reader = match FramedLogReader::open(path) {
        Ok(reader) => reader,
        Err(ReadError::NotFound { .. }) => return PreloadResult::NotFound,
        Err(err) => return PreloadResult::Failed(err.to_string()),
    };

    for _ in 0..PRELOAD_SCAN_RECORDS {
        match reader.read_next() {
            Ok(ReadOutcome::Record(Record::Run(run))) => {
                return PreloadResult::Identity(run);
            }
            Ok(ReadOutcome::Record(_)) => {}
            Ok(ReadOutcome::Eof) => break,
            Err(err) => return PreloadResult::Failed(err.to_string()),
        }
    }
    PreloadResult::NotFound
}

#[cfg(test)]
#[path = "preload_tests.rs"]
mod tests;
