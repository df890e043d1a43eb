// SPDX-License-Identifier: Apache-2.0
//! The auto-tick timer (spec.md §4.6). Schedules ticks relative to the
//! target cadence, not to when the previous tick finished, so drift does
//! not accumulate under load — the same discipline the teacher's ping
//! loop in `echo-session-ws-gateway::handle_socket` uses around
//! `tokio::time::interval`.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::controller::WorldHandle;

/// Runs until the process is torn down (the caller aborts this task on
/// shutdown). Ticks every `period`, passing `period`'s millisecond value
/// as `dt` to the world.
pub async fn run(world: WorldHandle, period: Duration) {
    let dt_millis: i64 = period.as_millis().try_into().unwrap_or(i64::MAX);
    let mut interval = time::interval(period);
    // `Burst` (the default) fires back-to-back catch-up ticks after a
    // stall; `Delay` would let drift accumulate. Skipping missed ticks
    // keeps the mean gap at `period` without a pile-up of stale dt's.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        world.auto_tick(dt_millis).await;
    }
}

/// Parses `--tick-period` into the server's tick mode: `Some(period)` for
/// auto-tick, `None` for manual-tick. The CLI layer already rejects
/// non-positive values, so this only converts units.
#[must_use]
pub fn period_from_millis(millis: Option<i64>) -> Option<Duration> {
    millis.map(|ms| {
        if ms <= 0 {
            warn!(ms, "tick period should already be validated positive");
        }
        Duration::from_millis(ms.unsigned_abs())
    })
}
