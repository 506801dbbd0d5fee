// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tokio::time::timeout;

fn timer(live: bool) -> (HeartbeatTimer, Arc<AtomicBool>) {
    let probe = Arc::new(AtomicBool::new(live));
    (
        HeartbeatTimer::new(Duration::from_secs(1), Arc::clone(&probe)),
        probe,
    )
}

#[tokio::test(start_paused = true)]
async fn delivers_beats_while_live() {
    let (timer, _probe) = timer(true);
    timer.start();
    assert!(timer.wait().await);
    // The next interval was scheduled on delivery.
    assert!(timer.is_armed());
    assert!(timer.wait().await);
}

#[tokio::test(start_paused = true)]
async fn stops_silently_when_probe_goes_false() {
    let (timer, probe) = timer(true);
    timer.start();
    probe.store(false, Ordering::Release);
    assert!(!timer.wait().await);
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn stop_unblocks_a_pending_waiter() {
    let (timer, _probe) = timer(true);
    timer.start();
    let timer = Arc::new(timer);
    let waiter = {
        let timer = Arc::clone(&timer);
        tokio::spawn(async move { timer.wait().await })
    };
    tokio::task::yield_now().await;
    timer.stop();
    timer.stop();
    assert!(!timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap());
}

#[tokio::test(start_paused = true)]
async fn wait_on_unarmed_timer_returns_false() {
    let (timer, _probe) = timer(true);
    assert!(!timer.wait().await);
}

#[tokio::test(start_paused = true)]
async fn reset_pushes_the_deadline_out() {
    let (timer, _probe) = timer(true);
    timer.start();

    // Half an interval in, a reset restarts the full interval.
    tokio::time::sleep(Duration::from_millis(500)).await;
    timer.reset();

    let started = tokio::time::Instant::now();
    assert!(timer.wait().await);
    assert!(started.elapsed() >= Duration::from_secs(1));
}
