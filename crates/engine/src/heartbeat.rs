// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared heartbeat timer.
//!
//! One timer serves every live run. It is the safety net under the file
//! watchers: when notifications are lost or unsupported, the heartbeat
//! still wakes the loop so a live drain catches the run up. On each expiry
//! it delivers one beat only while the live probe holds; otherwise it
//! silently disarms.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug)]
struct TimerState {
    armed: bool,
    deadline: Instant,
    /// Bumped on every start/reset/stop so a waiter can tell its deadline
    /// from a newer one.
    epoch: u64,
}

/// Periodic wake-up shared by all live runs.
#[derive(Debug)]
pub struct HeartbeatTimer {
    interval: Duration,
    live: Arc<AtomicBool>,
    state: Mutex<TimerState>,
    changed: Notify,
}

impl HeartbeatTimer {
    /// `live` is the probe consulted at each expiry; when it reads false
    /// the timer stops instead of delivering.
    pub fn new(interval: Duration, live: Arc<AtomicBool>) -> Self {
        Self {
            interval,
            live,
            state: Mutex::new(TimerState {
                armed: false,
                deadline: Instant::now(),
                epoch: 0,
            }),
            changed: Notify::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer with a fresh full interval.
    pub fn start(&self) {
        self.arm();
    }

    /// Reset to a fresh full interval, debouncing work a watcher already
    /// triggered.
    pub fn reset(&self) {
        self.arm();
    }

    fn arm(&self) {
        let mut state = self.state.lock();
        state.armed = true;
        state.deadline = Instant::now() + self.interval;
        state.epoch += 1;
        drop(state);
        self.changed.notify_waiters();
    }

    /// Disarm. Idempotent; a pending waiter returns false.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.armed = false;
        state.epoch += 1;
        drop(state);
        self.changed.notify_waiters();
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().armed
    }

    /// Wait for the next expiry.
    ///
    /// Returns true to deliver one heartbeat (the next interval is already
    /// scheduled), false when the timer stopped or the live probe failed.
    pub async fn wait(&self) -> bool {
        loop {
            let notified = self.changed.notified();
            let (armed, deadline, epoch) = {
                let state = self.state.lock();
                (state.armed, state.deadline, state.epoch)
            };
            if !armed {
                return false;
            }

            let now = Instant::now();
            if now >= deadline {
                let mut state = self.state.lock();
                // A start/reset/stop that raced us wins; go around again.
                if state.epoch != epoch {
                    continue;
                }
                if self.live.load(Ordering::Acquire) {
                    state.deadline = now + self.interval;
                    state.epoch += 1;
                    return true;
                }
                state.armed = false;
                state.epoch += 1;
                return false;
            }

            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {}
                _ = notified => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
