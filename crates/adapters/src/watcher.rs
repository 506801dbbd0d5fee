// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-path file watcher with coalesced change notifications.
//!
//! Wraps a platform watcher behind a single-slot channel: however many OS
//! events arrive before the consumer catches up, at most one notification
//! is buffered. Lost events are acceptable; the heartbeat drains the run
//! anyway. If the OS watch cannot be established the caller falls back to
//! heartbeat polling alone.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors establishing a watch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watcher already started")]
    AlreadyStarted,
    #[error("file watch failed: {0}")]
    Notify(#[from] notify::Error),
}

/// Watches one path and reports that it changed.
///
/// One consumer at a time. `finish()` releases the OS watch and unblocks a
/// waiter with `None`.
pub struct FileWatcher {
    watcher: Mutex<Option<RecommendedWatcher>>,
    rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self {
            watcher: Mutex::new(None),
            rx: Mutex::new(None),
        }
    }

    /// Begin observing `path`. Starting an already-started watcher is an
    /// error; a failed start leaves the watcher unstarted.
    pub fn start(&self, path: &Path) -> Result<(), WatchError> {
        let mut guard = self.watcher.lock();
        if guard.is_some() {
            return Err(WatchError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel(1);
        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if res.is_ok() {
                // Single-slot coalescing: a full channel means a
                // notification is already pending.
                let _ = tx.try_send(());
            }
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "file watch established");

        *guard = Some(watcher);
        *self.rx.lock() = Some(rx);
        Ok(())
    }

    /// Wait for the next change notification.
    ///
    /// Returns `None` once `finish()` has released the watch (or if the
    /// watcher was never started).
    pub async fn wait_for_msg(&self) -> Option<()> {
        let mut rx = self.rx.lock().take()?;
        let msg = rx.recv().await;
        *self.rx.lock() = Some(rx);
        msg
    }

    /// Release the OS watch. Safe to call repeatedly; a blocked
    /// `wait_for_msg` observes the closed channel and returns `None`.
    pub fn finish(&self) {
        *self.watcher.lock() = None;
    }

    pub fn is_started(&self) -> bool {
        self.watcher.lock().is_some()
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("started", &self.is_started())
            .finish()
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
