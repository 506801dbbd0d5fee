// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace coordinator.
//!
//! Glue between discovery, selection, tailing, watchers, the heartbeat, and
//! the view. All mutable state here is touched only by the UI loop: every
//! handler runs synchronously, mutates coordinator state, and returns the
//! work units to dispatch next. Readers are closed on deselect, on exit
//! processing, on shutdown, and when a selection raced reader creation.

use crate::heartbeat::HeartbeatTimer;
use crate::msg::{Cmd, Msg, PreloadResult};
use crate::preload::OverviewPreloader;
use crate::tail::{ChunkBudget, ChunkedBatch, TailController};
use crate::view::RunView;
use runboard_adapters::FileWatcher;
use runboard_core::{Config, RunKey, RunMsg, RunOverview, RunState};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Construction options for a coordinator.
#[derive(Debug, Clone)]
pub struct WorkspaceOptions {
    /// Workspace root containing the run folders.
    pub root: PathBuf,
    pub config: Config,
    /// Follow live runs with watchers and the heartbeat. Off in snapshot
    /// mode, where a boot load is the whole job.
    pub follow: bool,
    /// Select every discovered run instead of only the most recent.
    pub select_all: bool,
    /// Run to auto-select first (the `latest-run` symlink target).
    pub preferred_run: Option<RunKey>,
    /// Heartbeat interval override (env knob); beats the config file.
    pub heartbeat_override: Option<std::time::Duration>,
    /// Directory poll override (env knob); beats the config file.
    pub dir_poll_override: Option<std::time::Duration>,
}

impl WorkspaceOptions {
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            root,
            config,
            follow: true,
            select_all: false,
            preferred_run: None,
            heartbeat_override: None,
            dir_poll_override: None,
        }
    }

    fn heartbeat_interval(&self) -> std::time::Duration {
        self.heartbeat_override
            .unwrap_or_else(|| self.config.heartbeat_interval())
    }

    fn dir_poll_interval(&self) -> std::time::Duration {
        self.dir_poll_override
            .unwrap_or_else(|| self.config.dir_poll_interval())
    }
}

/// Per-run handles owned by the coordinator while the run is selected.
struct RunHandle {
    tail: Arc<TailController>,
    watcher: Option<Arc<FileWatcher>>,
    state: RunState,
}

/// Owns selection state and the lifecycle of every reader, watcher, and
/// the shared heartbeat.
pub struct WorkspaceCoordinator<V: RunView> {
    opts: WorkspaceOptions,
    view: V,
    run_keys: Vec<RunKey>,
    cursor: usize,
    selected: BTreeSet<RunKey>,
    pinned: Option<RunKey>,
    runs: HashMap<RunKey, RunHandle>,
    overviews: HashMap<RunKey, RunOverview>,
    preloader: OverviewPreloader,
    heartbeat: Arc<HeartbeatTimer>,
    has_live: Arc<AtomicBool>,
    heartbeat_running: bool,
    auto_selected: bool,
    quitting: bool,
}

impl<V: RunView> WorkspaceCoordinator<V> {
    pub fn new(opts: WorkspaceOptions, view: V) -> Self {
        let has_live = Arc::new(AtomicBool::new(false));
        let heartbeat = Arc::new(HeartbeatTimer::new(
            opts.heartbeat_interval(),
            Arc::clone(&has_live),
        ));
        let preloader = OverviewPreloader::new(opts.config.max_concurrent_preloads);
        Self {
            opts,
            view,
            run_keys: Vec::new(),
            cursor: 0,
            selected: BTreeSet::new(),
            pinned: None,
            runs: HashMap::new(),
            overviews: HashMap::new(),
            preloader,
            heartbeat,
            has_live,
            heartbeat_running: false,
            auto_selected: false,
            quitting: false,
        }
    }

    /// Work units that start the workspace: the first directory scan.
    pub fn bootstrap(&self) -> Vec<Cmd> {
        vec![Cmd::ScanRunDirs {
            root: self.opts.root.clone(),
            delay: None,
        }]
    }

    /// Process one message. Never blocks.
    pub fn handle(&mut self, msg: Msg) -> Vec<Cmd> {
        if self.quitting {
            return Vec::new();
        }
        tracing::trace!(msg = msg.name(), run_key = ?msg.run_key(), "handling");
        match msg {
            Msg::RunDirs { run_keys, err } => self.on_run_dirs(run_keys, err),
            Msg::ReaderInit { run_key, tail } => self.on_reader_init(run_key, tail),
            Msg::ChunkedBatch { run_key, batch } => self.on_chunked_batch(run_key, batch),
            Msg::Batch { run_key, msgs } => self.on_batch(run_key, msgs),
            Msg::FileChanged { run_key } => self.on_file_changed(run_key),
            Msg::Heartbeat => self.on_heartbeat(),
            Msg::OverviewPreloaded { run_key, result } => self.on_preloaded(run_key, result),
            Msg::RunFailed { run_key, error } => self.on_run_failed(run_key, error),
            Msg::ToggleRunSelected { run_key } => self.on_toggle(run_key),
            Msg::PinRun { run_key } => self.on_pin(run_key),
            Msg::Quit => {
                self.shutdown();
                Vec::new()
            }
        }
    }

    // ── discovery ───────────────────────────────────────────────────────

    fn on_run_dirs(&mut self, run_keys: Vec<RunKey>, err: Option<String>) -> Vec<Cmd> {
        let mut cmds = Vec::new();
        match err {
            Some(error) => {
                // Polling continues; the next scan may succeed.
                tracing::warn!(error = %error, root = %self.opts.root.display(), "run directory scan failed");
            }
            None => {
                if run_keys != self.run_keys {
                    self.apply_run_dirs(run_keys, &mut cmds);
                }
                self.enqueue_missing_overviews();
                self.start_preloads(&mut cmds);
            }
        }
        if self.opts.follow {
            cmds.push(Cmd::ScanRunDirs {
                root: self.opts.root.clone(),
                delay: Some(self.opts.dir_poll_interval()),
            });
        }
        cmds
    }

    fn apply_run_dirs(&mut self, run_keys: Vec<RunKey>, cmds: &mut Vec<Cmd>) {
        let cursor_key = self.run_keys.get(self.cursor).cloned();
        let incoming: HashSet<RunKey> = run_keys.iter().cloned().collect();

        let disappeared: Vec<RunKey> = self
            .run_keys
            .iter()
            .filter(|key| !incoming.contains(*key))
            .cloned()
            .collect();
        for key in disappeared {
            tracing::debug!(run_key = %key, "run directory disappeared");
            self.drop_run(&key);
            self.selected.remove(&key);
            self.overviews.remove(&key);
            if self.pinned.as_ref() == Some(&key) {
                self.pinned = None;
            }
        }

        self.run_keys = run_keys;
        self.cursor = cursor_key
            .and_then(|key| self.run_keys.iter().position(|k| k == &key))
            .unwrap_or_else(|| self.cursor.min(self.run_keys.len().saturating_sub(1)));
        self.preloader.drop_queued_not_present(&incoming);

        if !self.auto_selected && !self.run_keys.is_empty() {
            self.auto_selected = true;
            if self.opts.select_all {
                let keys: Vec<RunKey> = self.run_keys.clone();
                for key in keys {
                    cmds.extend(self.select(key));
                }
            } else {
                // Discovery returns newest first; prefer the latest-run
                // symlink target when it is present.
                let target = self
                    .opts
                    .preferred_run
                    .clone()
                    .filter(|key| self.run_keys.contains(key))
                    .or_else(|| self.run_keys.first().cloned());
                if let Some(key) = target {
                    cmds.extend(self.select(key));
                }
            }
        }
    }

    fn enqueue_missing_overviews(&mut self) {
        let keys: Vec<RunKey> = self.run_keys.clone();
        for key in keys {
            if !self.overviews.contains_key(&key) {
                self.overviews.insert(key.clone(), RunOverview::new(key.clone()));
            }
            let has_identity = self.overviews[&key].id.is_some();
            if !self.selected.contains(&key) && !has_identity {
                self.preloader.enqueue(key);
            }
        }
    }

    fn start_preloads(&mut self, cmds: &mut Vec<Cmd>) {
        for key in self.preloader.dequeue_startable() {
            match key.log_path(&self.opts.root) {
                Some(path) => cmds.push(Cmd::Preload { run_key: key, path }),
                None => self.preloader.mark_done(&key),
            }
        }
    }

    // ── selection ───────────────────────────────────────────────────────

    fn on_toggle(&mut self, run_key: RunKey) -> Vec<Cmd> {
        if !self.run_keys.contains(&run_key) {
            tracing::warn!(%run_key, "toggle for unknown run");
            return Vec::new();
        }
        if self.selected.contains(&run_key) {
            self.deselect(&run_key);
            Vec::new()
        } else {
            self.select(run_key)
        }
    }

    fn select(&mut self, run_key: RunKey) -> Vec<Cmd> {
        self.selected.insert(run_key.clone());
        if self.pinned.is_none() {
            self.pinned = Some(run_key.clone());
            self.view.promote_series_to_top(&run_key);
        }
        let Some(path) = run_key.log_path(&self.opts.root) else {
            tracing::warn!(%run_key, "run key has no derivable log path");
            self.set_overview_state(&run_key, RunState::Failed);
            return Vec::new();
        };
        tracing::info!(%run_key, "run selected");
        vec![Cmd::InitReader { run_key, path }]
    }

    fn deselect(&mut self, run_key: &RunKey) {
        tracing::info!(run_key = %run_key, "run deselected");
        self.selected.remove(run_key);
        if self.pinned.as_ref() == Some(run_key) {
            self.pinned = None;
        }
        self.drop_run(run_key);
        self.set_overview_state(run_key, RunState::Closed);
    }

    /// Close the reader, stop the watcher, and drop the run's series.
    fn drop_run(&mut self, run_key: &RunKey) {
        if let Some(handle) = self.runs.remove(run_key) {
            handle.tail.close();
            if let Some(watcher) = handle.watcher {
                watcher.finish();
            }
        }
        self.view.remove_series(run_key);
        self.recompute_live();
        self.stop_heartbeat_if_idle();
    }

    fn on_pin(&mut self, run_key: RunKey) -> Vec<Cmd> {
        if !self.run_keys.contains(&run_key) {
            return Vec::new();
        }
        let cmds = if self.selected.contains(&run_key) {
            Vec::new()
        } else {
            // Pinning a non-selected run selects it first.
            self.select(run_key.clone())
        };
        self.pinned = Some(run_key.clone());
        self.view.promote_series_to_top(&run_key);
        cmds
    }

    // ── reader lifecycle ────────────────────────────────────────────────

    fn on_reader_init(&mut self, run_key: RunKey, tail: Arc<TailController>) -> Vec<Cmd> {
        if !self.selected.contains(&run_key) {
            // Deselected while the reader was being created.
            tracing::debug!(%run_key, "selection raced reader init; closing");
            tail.close();
            return Vec::new();
        }
        self.set_overview_state(&run_key, RunState::Booting);
        self.runs.insert(
            run_key.clone(),
            RunHandle {
                tail: Arc::clone(&tail),
                watcher: None,
                state: RunState::Booting,
            },
        );
        vec![Cmd::BootChunk {
            run_key,
            tail,
            budget: ChunkBudget::boot(&self.opts.config),
        }]
    }

    fn on_chunked_batch(&mut self, run_key: RunKey, batch: ChunkedBatch) -> Vec<Cmd> {
        if !self.runs.contains_key(&run_key) {
            tracing::debug!(%run_key, "chunk for dropped run");
            return Vec::new();
        }
        tracing::debug!(%run_key, progress = batch.progress, has_more = batch.has_more, "boot chunk");
        self.apply_run_msgs(&run_key, batch.msgs);

        let mut cmds = Vec::new();
        let Some(handle) = self.runs.get_mut(&run_key) else {
            return cmds;
        };
        if handle.state != RunState::Booting {
            // The chunk carried the exit record (or a failure landed).
            return cmds;
        }

        if batch.has_more {
            cmds.push(Cmd::BootChunk {
                run_key,
                tail: Arc::clone(&handle.tail),
                budget: ChunkBudget::boot(&self.opts.config),
            });
            return cmds;
        }

        // Boot complete without an exit record: the run is live.
        handle.state = RunState::Live;
        if !self.opts.follow {
            // Snapshot mode: the boot load was the whole job.
            self.runs[&run_key].tail.close();
            self.set_overview_state(&run_key, RunState::Live);
            return cmds;
        }

        self.start_watcher(&run_key, &mut cmds);
        self.set_overview_state(&run_key, RunState::Live);
        self.recompute_live();
        if !self.heartbeat_running && self.has_live.load(Ordering::Acquire) {
            self.heartbeat.start();
            self.heartbeat_running = true;
            cmds.push(Cmd::WaitHeartbeat {
                timer: Arc::clone(&self.heartbeat),
            });
        }
        cmds
    }

    fn start_watcher(&mut self, run_key: &RunKey, cmds: &mut Vec<Cmd>) {
        let Some(handle) = self.runs.get_mut(run_key) else {
            return;
        };
        let watcher = Arc::new(FileWatcher::new());
        match watcher.start(handle.tail.path()) {
            Ok(()) => {
                handle.watcher = Some(Arc::clone(&watcher));
                cmds.push(Cmd::WaitFileChange {
                    run_key: run_key.clone(),
                    watcher,
                });
            }
            Err(err) => {
                // Degraded but functional: the heartbeat alone drives drains.
                tracing::warn!(run_key = %run_key, error = %err, "file watcher failed, falling back to heartbeat polling");
            }
        }
    }

    // ── live tailing ────────────────────────────────────────────────────

    fn on_file_changed(&mut self, run_key: RunKey) -> Vec<Cmd> {
        let Some(handle) = self.runs.get(&run_key) else {
            return Vec::new();
        };
        if handle.state != RunState::Live {
            return Vec::new();
        }
        let mut cmds = vec![Cmd::LiveDrain {
            run_key: run_key.clone(),
            tail: Arc::clone(&handle.tail),
            budget: ChunkBudget::live(&self.opts.config),
        }];
        // The watcher wait is one-shot per event; re-arm it.
        if let Some(watcher) = &handle.watcher {
            cmds.push(Cmd::WaitFileChange {
                run_key,
                watcher: Arc::clone(watcher),
            });
        }
        // The drain above already does the heartbeat's work; debounce it.
        if self.heartbeat_running {
            self.heartbeat.reset();
        }
        cmds
    }

    fn on_heartbeat(&mut self) -> Vec<Cmd> {
        if !self.has_live.load(Ordering::Acquire) {
            self.heartbeat.stop();
            self.heartbeat_running = false;
            return Vec::new();
        }
        let mut cmds = Vec::new();
        for (run_key, handle) in &self.runs {
            if handle.state == RunState::Live && self.selected.contains(run_key) {
                cmds.push(Cmd::LiveDrain {
                    run_key: run_key.clone(),
                    tail: Arc::clone(&handle.tail),
                    budget: ChunkBudget::live(&self.opts.config),
                });
            }
        }
        cmds.push(Cmd::WaitHeartbeat {
            timer: Arc::clone(&self.heartbeat),
        });
        cmds
    }

    fn on_batch(&mut self, run_key: RunKey, msgs: Vec<RunMsg>) -> Vec<Cmd> {
        if !self.runs.contains_key(&run_key) {
            return Vec::new();
        }
        self.apply_run_msgs(&run_key, msgs);
        Vec::new()
    }

    // ── message application ─────────────────────────────────────────────

    fn apply_run_msgs(&mut self, run_key: &RunKey, msgs: Vec<RunMsg>) {
        for msg in msgs {
            let overview = self
                .overviews
                .entry(run_key.clone())
                .or_insert_with(|| RunOverview::new(run_key.clone()));
            overview.apply(&msg);
            match &msg {
                RunMsg::History(metrics) => self.view.append_history(run_key, metrics),
                RunMsg::Stats {
                    epoch_secs,
                    metrics,
                } => self.view.append_stats(run_key, *epoch_secs, metrics),
                RunMsg::FileComplete { exit_code } => self.finish_run(run_key, *exit_code),
                RunMsg::Run(_) | RunMsg::Summary(_) | RunMsg::SystemInfo(_) => {
                    let overview = &self.overviews[run_key];
                    self.view.set_run_overview(overview);
                }
            }
        }
    }

    /// Exit record processed: settle state, stop the watcher, and release
    /// the heartbeat if this was the last live run.
    fn finish_run(&mut self, run_key: &RunKey, exit_code: i32) {
        let state = if exit_code == 0 {
            RunState::Finished
        } else {
            RunState::Failed
        };
        tracing::info!(run_key = %run_key, exit_code, "run complete");
        if let Some(handle) = self.runs.get_mut(run_key) {
            handle.state = state;
            if let Some(watcher) = handle.watcher.take() {
                watcher.finish();
            }
        }
        self.set_overview_state(run_key, state);
        self.recompute_live();
        self.stop_heartbeat_if_idle();
    }

    fn on_run_failed(&mut self, run_key: RunKey, error: String) -> Vec<Cmd> {
        if !self.selected.contains(&run_key) {
            tracing::debug!(%run_key, error = %error, "failure for dropped run");
            return Vec::new();
        }
        tracing::warn!(%run_key, error = %error, "run failed");
        if let Some(handle) = self.runs.get_mut(&run_key) {
            handle.state = RunState::Failed;
            handle.tail.close();
            if let Some(watcher) = handle.watcher.take() {
                watcher.finish();
            }
        }
        self.set_overview_state(&run_key, RunState::Failed);
        self.recompute_live();
        self.stop_heartbeat_if_idle();
        Vec::new()
    }

    fn on_preloaded(&mut self, run_key: RunKey, result: PreloadResult) -> Vec<Cmd> {
        self.preloader.mark_done(&run_key);
        match result {
            PreloadResult::Identity(run) => {
                let overview = self
                    .overviews
                    .entry(run_key.clone())
                    .or_insert_with(|| RunOverview::new(run_key.clone()));
                overview.apply(&RunMsg::Run(run));
                let overview = &self.overviews[&run_key];
                self.view.set_run_overview(overview);
            }
            PreloadResult::NotFound => {
                // Normal for a run that just started; the identity arrives
                // during boot once the run is selected.
                tracing::debug!(%run_key, "overview preload found no identity");
            }
            PreloadResult::Failed(error) => {
                tracing::warn!(%run_key, error = %error, "overview preload failed");
            }
        }
        let mut cmds = Vec::new();
        self.start_preloads(&mut cmds);
        cmds
    }

    // ── shutdown ────────────────────────────────────────────────────────

    /// Stop the heartbeat and every watcher, and close every reader.
    fn shutdown(&mut self) {
        tracing::info!("workspace shutting down");
        self.quitting = true;
        self.heartbeat.stop();
        self.heartbeat_running = false;
        self.has_live.store(false, Ordering::Release);
        for handle in self.runs.values_mut() {
            handle.tail.close();
            if let Some(watcher) = handle.watcher.take() {
                watcher.finish();
            }
            handle.state = RunState::Closed;
        }
    }

    // ── bookkeeping ─────────────────────────────────────────────────────

    fn set_overview_state(&mut self, run_key: &RunKey, state: RunState) {
        let overview = self
            .overviews
            .entry(run_key.clone())
            .or_insert_with(|| RunOverview::new(run_key.clone()));
        overview.state = state;
        let overview = &self.overviews[run_key];
        self.view.set_run_overview(overview);
    }

    fn recompute_live(&mut self) {
        let any_live = self
            .runs
            .iter()
            .any(|(key, handle)| handle.state == RunState::Live && self.selected.contains(key));
        self.has_live.store(any_live, Ordering::Release);
    }

    fn stop_heartbeat_if_idle(&mut self) {
        if self.heartbeat_running && !self.has_live.load(Ordering::Acquire) {
            self.heartbeat.stop();
            self.heartbeat_running = false;
        }
    }

    // ── accessors ───────────────────────────────────────────────────────

    pub fn run_keys(&self) -> &[RunKey] {
        &self.run_keys
    }

    pub fn selected(&self) -> &BTreeSet<RunKey> {
        &self.selected
    }

    pub fn pinned(&self) -> Option<&RunKey> {
        self.pinned.as_ref()
    }

    pub fn overview(&self, run_key: &RunKey) -> Option<&RunOverview> {
        self.overviews.get(run_key)
    }

    /// Overviews in display order.
    pub fn overviews(&self) -> impl Iterator<Item = &RunOverview> {
        self.run_keys
            .iter()
            .filter_map(|key| self.overviews.get(key))
    }

    pub fn state_of(&self, run_key: &RunKey) -> Option<RunState> {
        self.runs.get(run_key).map(|handle| handle.state)
    }

    pub fn has_live_runs(&self) -> bool {
        self.has_live.load(Ordering::Acquire)
    }

    pub fn heartbeat_running(&self) -> bool {
        self.heartbeat_running
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

#[cfg(test)]
#[path = "workspace_tests/mod.rs"]
mod tests;
