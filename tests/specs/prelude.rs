//! Shared helpers for the CLI specs.

use assert_cmd::Command;
use runboard_core::Record;
use runboard_storage::writer::write_log;
use std::path::Path;
use tempfile::TempDir;

/// A scratch workspace root.
pub fn workspace() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a run directory with the given records.
pub fn write_run(root: &Path, key: &str, records: &[Record]) {
    let id = key.rsplit('-').next().unwrap();
    let path = root.join(key).join(format!("run-{id}.wandb"));
    write_log(&path, records).unwrap();
}

/// The binary under test, with a stable environment.
pub fn runboard() -> Command {
    let mut cmd = Command::cargo_bin("runboard").unwrap();
    cmd.env_remove("WANDB_DIR").env("NO_COLOR", "1");
    cmd
}
