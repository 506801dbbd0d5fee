// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text run view.
//!
//! Streams run status lines and latest metric values to stdout. This is
//! the narrow-interface renderer; charts and interactive layout are out of
//! scope.

use crate::color::{self, codes};
use runboard_core::{Metrics, RunKey, RunOverview, RunState};
use runboard_engine::{RunView, WorkspaceCoordinator};
use std::collections::{BTreeMap, HashMap};

/// How many metrics a status line shows before eliding.
const MAX_INLINE_METRICS: usize = 4;

pub struct TextView {
    color: bool,
    titles: HashMap<RunKey, String>,
    printed_states: HashMap<RunKey, RunState>,
    pinned: Option<RunKey>,
}

impl TextView {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            titles: HashMap::new(),
            printed_states: HashMap::new(),
            pinned: None,
        }
    }

    fn title(&self, run_key: &RunKey) -> String {
        self.titles
            .get(run_key)
            .cloned()
            .unwrap_or_else(|| run_key.to_string())
    }
}

impl RunView for TextView {
    fn set_run_overview(&mut self, overview: &RunOverview) {
        self.titles
            .insert(overview.run_key.clone(), overview.title().to_string());
        let changed = self.printed_states.get(&overview.run_key) != Some(&overview.state);
        if changed {
            self.printed_states
                .insert(overview.run_key.clone(), overview.state);
            println!("{}", status_line(self.color, overview));
        }
    }

    fn append_history(&mut self, run_key: &RunKey, metrics: &Metrics) {
        let title = self.title(run_key);
        println!("{}", history_line(self.color, &title, metrics));
    }

    fn append_stats(&mut self, run_key: &RunKey, epoch_secs: i64, metrics: &BTreeMap<String, f64>) {
        let title = self.title(run_key);
        println!(
            "{}",
            color::paint(
                self.color,
                codes::MUTED,
                &format!("  {title} sys@{epoch_secs} · {} series", metrics.len()),
            )
        );
    }

    fn promote_series_to_top(&mut self, run_key: &RunKey) {
        self.pinned = Some(run_key.clone());
    }

    fn remove_series(&mut self, run_key: &RunKey) {
        if self.pinned.as_ref() == Some(run_key) {
            self.pinned = None;
        }
        self.printed_states.remove(run_key);
    }
}

/// `● title [project] state (exit N)`
fn status_line(color: bool, overview: &RunOverview) -> String {
    let mut line = format!(
        "● {}",
        color::paint(color, codes::HEADER, overview.title())
    );
    if let Some(project) = &overview.project {
        line.push_str(&format!(
            " {}",
            color::paint(color, codes::CONTEXT, &format!("[{project}]"))
        ));
    }
    line.push_str(&format!(
        " {}",
        color::paint(color, color::state_code(overview.state), overview.state.label())
    ));
    if let Some(code) = overview.exit_code {
        line.push_str(&color::paint(color, codes::MUTED, &format!(" (exit {code})")));
    }
    line
}

/// `  title step N · loss 0.4321 acc 0.9100 (+2 more)`
fn history_line(color: bool, title: &str, metrics: &Metrics) -> String {
    let step = metrics
        .values()
        .filter_map(|series| series.last())
        .map(|(x, _)| x)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut line = format!("  {title}");
    if step.is_finite() {
        line.push_str(&format!(" step {step}"));
    }
    line.push_str(" ·");
    for (name, series) in metrics.iter().take(MAX_INLINE_METRICS) {
        if let Some((_, y)) = series.last() {
            line.push_str(&format!(
                " {} {}",
                color::paint(color, codes::CONTEXT, name),
                color::paint(color, codes::LITERAL, &format_value(y)),
            ));
        }
    }
    if metrics.len() > MAX_INLINE_METRICS {
        line.push_str(&color::paint(
            color,
            codes::MUTED,
            &format!(" (+{} more)", metrics.len() - MAX_INLINE_METRICS),
        ));
    }
    line
}

fn format_value(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e9 {
        format!("{value}")
    } else {
        format!("{value:.4}")
    }
}

/// Print one block per run in display order; returns the failed-run count.
pub fn print_summary<V: runboard_engine::RunView>(
    coordinator: &WorkspaceCoordinator<V>,
    color: bool,
) -> usize {
    let mut failed = 0;
    for overview in coordinator.overviews() {
        if overview.state == RunState::Failed {
            failed += 1;
        }
        println!();
        println!("{}", status_line(color, overview));
        if let Some(id) = &overview.id {
            println!("  {}", color::paint(color, codes::MUTED, &format!("id {id}")));
        }
        for (key, value) in overview.summary.iter().take(8) {
            println!(
                "  {} {}",
                color::paint(color, codes::CONTEXT, key),
                color::paint(color, codes::LITERAL, &value.to_string()),
            );
        }
    }
    failed
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
