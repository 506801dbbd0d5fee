// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for timing overrides.
//!
//! These beat the config file and exist for tests and for debugging a
//! misbehaving tracker without editing configuration.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Directory poll interval override (`RUNBOARD_DIR_POLL_MS`).
pub fn dir_poll_override() -> Option<Duration> {
    parse_duration_ms("RUNBOARD_DIR_POLL_MS")
}

/// Heartbeat interval override (`RUNBOARD_HEARTBEAT_MS`).
///
/// The config file knob is clamped to whole seconds >= 1; this override is
/// not, so tests can run a fast heartbeat.
pub fn heartbeat_override() -> Option<Duration> {
    parse_duration_ms("RUNBOARD_HEARTBEAT_MS")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
