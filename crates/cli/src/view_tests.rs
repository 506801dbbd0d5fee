// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use runboard_core::MetricSeries;

fn overview(state: RunState, exit_code: Option<i32>) -> RunOverview {
    let mut ov = RunOverview::new(RunKey::new("run-20240301_000000-aaa111"));
    ov.display_name = Some("warm-sunset-7".to_string());
    ov.project = Some("mnist".to_string());
    ov.state = state;
    ov.exit_code = exit_code;
    ov
}

#[test]
fn status_line_without_color_is_plain() {
    let line = status_line(false, &overview(RunState::Live, None));
    assert_eq!(line, "● warm-sunset-7 [mnist] live");
}

#[test]
fn status_line_shows_exit_code() {
    let line = status_line(false, &overview(RunState::Failed, Some(137)));
    assert_eq!(line, "● warm-sunset-7 [mnist] failed (exit 137)");
}

#[test]
fn status_line_with_color_carries_escapes() {
    let line = status_line(true, &overview(RunState::Live, None));
    assert!(line.contains("\x1b[38;5;"));
    assert!(line.contains("\x1b[0m"));
}

#[test]
fn history_line_lists_latest_values() {
    let mut metrics = Metrics::new();
    metrics.insert("loss".to_string(), MetricSeries::single(3.0, 0.4321));
    metrics.insert("acc".to_string(), MetricSeries::single(3.0, 0.91));

    let line = history_line(false, "warm-sunset-7", &metrics);
    assert_eq!(line, "  warm-sunset-7 step 3 · acc 0.9100 loss 0.4321");
}

#[test]
fn history_line_elides_beyond_the_inline_limit() {
    let mut metrics = Metrics::new();
    for n in 0..6 {
        metrics.insert(format!("m{n}"), MetricSeries::single(1.0, 1.0));
    }
    let line = history_line(false, "t", &metrics);
    assert!(line.ends_with("(+2 more)"), "{line}");
}

#[yare::parameterized(
    integral = { 3.0, "3" },
    fractional = { 0.43215, "0.4322" },
    tiny = { 0.00004, "0.0000" },
)]
fn value_formatting(value: f64, expected: &str) {
    assert_eq!(format_value(value), expected);
}

#[test]
fn view_prints_state_changes_once() {
    let mut view = TextView::new(false);
    let ov = overview(RunState::Booting, None);
    view.set_run_overview(&ov);
    assert_eq!(view.printed_states[&ov.run_key], RunState::Booting);

    // Same state again: cache unchanged, nothing new recorded.
    view.set_run_overview(&ov);
    let mut live = ov.clone();
    live.state = RunState::Live;
    view.set_run_overview(&live);
    assert_eq!(view.printed_states[&ov.run_key], RunState::Live);
}

#[test]
fn remove_series_clears_pin_and_state() {
    let mut view = TextView::new(false);
    let ov = overview(RunState::Live, None);
    view.set_run_overview(&ov);
    view.promote_series_to_top(&ov.run_key);
    assert_eq!(view.pinned.as_ref(), Some(&ov.run_key));

    view.remove_series(&ov.run_key);
    assert_eq!(view.pinned, None);
    assert!(!view.printed_states.contains_key(&ov.run_key));
}
