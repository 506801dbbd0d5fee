// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run directory discovery.
//!
//! A workspace root contains run folders named `run-YYYYMMDD_HHMMSS-<id>`
//! or `offline-run-YYYYMMDD_HHMMSS-<id>`; anything else is ignored. The
//! scan is repeated on a fixed interval by the coordinator; a failed scan
//! is reported, logged, and polling continues.

use chrono::NaiveDateTime;
use runboard_core::run::sort_for_display;
use runboard_core::RunKey;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable selecting the workspace root.
pub const ROOT_ENV: &str = "WANDB_DIR";

/// Timestamp format embedded in run folder names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors reading the workspace root.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot read workspace root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Enumerate run directories under `root`, newest first.
///
/// Unreadable entries are skipped; only a failure to read the root itself
/// is an error.
pub fn scan_run_dirs(root: &Path) -> Result<Vec<RunKey>, DiscoveryError> {
    let entries = std::fs::read_dir(root).map_err(|source| DiscoveryError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut keys = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_run_dir_name(name) {
            keys.push(RunKey::new(name));
        }
    }
    sort_for_display(&mut keys);
    Ok(keys)
}

/// Whether a folder name is a valid run directory name.
pub fn is_run_dir_name(name: &str) -> bool {
    let Some(rest) = name
        .strip_prefix("offline-run-")
        .or_else(|| name.strip_prefix("run-"))
    else {
        return false;
    };
    let Some((timestamp, id)) = rest.split_at_checked(15) else {
        return false;
    };
    let Some(id) = id.strip_prefix('-') else {
        return false;
    };
    !id.is_empty() && NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok()
}

/// Resolve the workspace root: explicit argument, then `WANDB_DIR`, then
/// `./wandb`.
pub fn resolve_root(arg: Option<&Path>) -> PathBuf {
    if let Some(path) = arg {
        return path.to_path_buf();
    }
    if let Ok(dir) = std::env::var(ROOT_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from("wandb")
}

/// The run the root's `latest-run` symlink points at, if any.
pub fn latest_run(root: &Path) -> Option<RunKey> {
    let target = std::fs::read_link(root.join("latest-run")).ok()?;
    let name = target.file_name()?.to_str()?;
    if is_run_dir_name(name) {
        Some(RunKey::new(name))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
