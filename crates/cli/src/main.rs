// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runboard: a terminal dashboard that tails W&B-style run directories.
//!
//! Follows active run logs as they grow and streams run overviews and
//! metric updates; `--once` boot-loads everything, prints a summary, and
//! exits.

mod app;
mod color;
mod view;

use anyhow::Context;
use clap::Parser;
use runboard_adapters::{env as env_knobs, latest_run, resolve_root};
use runboard_core::Config;
use runboard_engine::{WorkspaceCoordinator, WorkspaceOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::view::TextView;

#[derive(Debug, Parser)]
#[command(
    name = "runboard",
    version,
    about = "Terminal dashboard for tailing ML run logs",
    styles = color::clap_styles()
)]
struct Args {
    /// Workspace root containing run folders (default: $WANDB_DIR, then ./wandb)
    root: Option<PathBuf>,

    /// Config file (default: ~/.config/runboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append diagnostic logs to this file (RUST_LOG controls the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Boot-load every run, print overviews, and exit
    #[arg(long)]
    once: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    let root = resolve_root(args.root.as_deref());
    anyhow::ensure!(
        root.is_dir(),
        "workspace root {} is not a directory",
        root.display()
    );
    tracing::info!(root = %root.display(), once = args.once, "starting");

    let color = color::enabled(config.color, args.no_color);
    let opts = WorkspaceOptions {
        follow: !args.once,
        select_all: args.once,
        preferred_run: latest_run(&root),
        heartbeat_override: env_knobs::heartbeat_override(),
        dir_poll_override: env_knobs::dir_poll_override(),
        ..WorkspaceOptions::new(root, config)
    };

    let mut coordinator = WorkspaceCoordinator::new(opts, TextView::new(color));
    app::run(&mut coordinator, args.once).await;

    if args.once {
        let failed = view::print_summary(&coordinator, color);
        if failed > 0 {
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Set up non-blocking file logging when requested; a dashboard must not
/// write diagnostics to its own stdout.
fn init_logging(
    path: Option<&Path>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

/// Load the config file. An explicit `--config` must exist; the default
/// location is optional and silently falls back to defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => {
            let Some(base) = dirs::config_dir() else {
                return Ok(Config::default());
            };
            (base.join("runboard").join("config.toml"), false)
        }
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("cannot read config {}", path.display()));
        }
    };
    Config::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
