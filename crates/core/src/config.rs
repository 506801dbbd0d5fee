// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard configuration.
//!
//! Loaded from TOML by the binary and passed by value to constructors; no
//! global config. The ingestion core reads only the timing knobs, the rest
//! belong to the view.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Color output preference for the text view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// All user-tunable knobs, with defaults matching the recommended values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Heartbeat interval in seconds; clamped to >= 1.
    pub heartbeat_secs: u64,
    /// Boot chunk record budget.
    pub boot_chunk_records: usize,
    /// Boot chunk wall-clock budget in milliseconds.
    pub boot_chunk_max_ms: u64,
    /// Live drain record budget.
    pub live_chunk_records: usize,
    /// Live drain wall-clock budget in milliseconds.
    pub live_chunk_max_ms: u64,
    /// Run directory poll interval in seconds.
    pub dir_poll_secs: u64,
    /// Maximum overview preloads in flight.
    pub max_concurrent_preloads: usize,
    /// Whether the sidebar starts visible.
    pub show_sidebar: bool,
    /// Color output preference.
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heartbeat_secs: 1,
            boot_chunk_records: 1000,
            boot_chunk_max_ms: 100,
            live_chunk_records: 2000,
            live_chunk_max_ms: 50,
            dir_poll_secs: 5,
            max_concurrent_preloads: 4,
            show_sidebar: true,
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    /// Parse a TOML document. Unknown keys are rejected.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<Config>(text)?.normalized())
    }

    /// Clamp values to their documented minimums.
    pub fn normalized(mut self) -> Self {
        self.heartbeat_secs = self.heartbeat_secs.max(1);
        self.boot_chunk_records = self.boot_chunk_records.max(1);
        self.live_chunk_records = self.live_chunk_records.max(1);
        self.dir_poll_secs = self.dir_poll_secs.max(1);
        self.max_concurrent_preloads = self.max_concurrent_preloads.max(1);
        self
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn boot_chunk_max_time(&self) -> Duration {
        Duration::from_millis(self.boot_chunk_max_ms)
    }

    pub fn live_chunk_max_time(&self) -> Duration {
        Duration::from_millis(self.live_chunk_max_ms)
    }

    pub fn dir_poll_interval(&self) -> Duration {
        Duration::from_secs(self.dir_poll_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
