// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The UI loop.
//!
//! Single consumer of the bounded message channel: one message at a time,
//! each handler returning work units the executor runs in parallel. In
//! `--once` mode every unit produces exactly one message, so the loop ends
//! when the outstanding count drains to zero; in follow mode it runs until
//! Ctrl+C.

use runboard_engine::{Executor, Msg, RunView, WorkspaceCoordinator, MSG_CHANNEL_CAPACITY};
use tokio::sync::mpsc;

/// Pump messages until shutdown (follow mode) or until all work drains
/// (`once` mode).
pub async fn run<V: RunView>(coordinator: &mut WorkspaceCoordinator<V>, once: bool) {
    let (tx, mut rx) = mpsc::channel(MSG_CHANNEL_CAPACITY);
    let executor = Executor::new(tx);
    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());

    let cmds = coordinator.bootstrap();
    let mut outstanding = cmds.len();
    executor.dispatch_all(cmds);

    if once && outstanding == 0 {
        return;
    }

    loop {
        tokio::select! {
            maybe = rx.recv() => {
                let Some(msg) = maybe else { break };
                outstanding = outstanding.saturating_sub(1);
                let cmds = coordinator.handle(msg);
                outstanding += cmds.len();
                executor.dispatch_all(cmds);
                if once && outstanding == 0 {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupt received, shutting down");
                coordinator.handle(Msg::Quit);
                break;
            }
        }
    }
}
