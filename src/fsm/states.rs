//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! state objects, no heap.  Handlers talk to the Notecard only through the
//! port handed in by the engine.
//!
//! ```text
//!  IDLE ──[request pending]──▶ BASELINING ──[mode → continuous]──▶ SEARCHING
//!    ▲                                                               │
//!    │                    ┌──────────[new fix time]──────────────────┤
//!    │                    ▼                                          │
//!    ├──────────────── DELIVERED                                     │
//!    ├──────────────── STOPPED ◀─────────[stop marker]───────────────┤
//!    └──────────────── TIMED_OUT ◀───────[budget spent]──────────────┘
//! ```
//!
//! Every terminal state clears the request flag on entry and falls back to
//! Idle on its first update.

use super::context::{AcquisitionAttempt, FsmContext};
use super::{StateDescriptor, StateId};
use crate::alert;
use crate::app::events::{AttemptOutcome, DispatchReport};
use crate::app::ports::NotecardPort;
use crate::notecard::{LocationSample, PeripheralMode, Request};
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Baselining
        StateDescriptor {
            id: StateId::Baselining,
            name: "Baselining",
            on_enter: None,
            on_exit: None,
            on_update: baselining_update,
        },
        // Index 2 — Searching
        StateDescriptor {
            id: StateId::Searching,
            name: "Searching",
            on_enter: Some(searching_enter),
            on_exit: None,
            on_update: searching_update,
        },
        // Index 3 — Delivered
        StateDescriptor {
            id: StateId::Delivered,
            name: "Delivered",
            on_enter: Some(delivered_enter),
            on_exit: None,
            on_update: terminal_update,
        },
        // Index 4 — Stopped
        StateDescriptor {
            id: StateId::Stopped,
            name: "Stopped",
            on_enter: Some(stopped_enter),
            on_exit: None,
            on_update: terminal_update,
        },
        // Index 5 — TimedOut
        StateDescriptor {
            id: StateId::TimedOut,
            name: "TimedOut",
            on_enter: Some(timed_out_enter),
            on_exit: None,
            on_update: terminal_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

/// One `card.location` round trip.  `None` on transport failure.
fn query_location(notecard: &mut dyn NotecardPort) -> Option<LocationSample> {
    notecard
        .request_and_response(&Request::LocationStatus)
        .map(|rsp| LocationSample::from(&rsp))
}

fn command_mode(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort, mode: PeripheralMode) {
    if !notecard.send(&mode.to_request()) {
        warn!("GPS: mode change to {mode:?} not acknowledged");
    }
    ctx.commanded_mode = Some(mode);
}

fn restore_periodic(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
    let mode = PeripheralMode::periodic(ctx.config.location_periodic_secs);
    command_mode(ctx, notecard, mode);
}

/// Common terminal-state bookkeeping.
fn end_attempt(ctx: &mut FsmContext, outcome: AttemptOutcome) {
    ctx.clear_request();
    ctx.finish_attempt(outcome);
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext, _notecard: &mut dyn NotecardPort) {
    ctx.attempt = None;
    info!("IDLE: waiting for a location request");
}

fn idle_update(ctx: &mut FsmContext, _notecard: &mut dyn NotecardPort) -> Option<StateId> {
    if ctx.request_pending() {
        return Some(StateId::Baselining);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BASELINING state: remember the current fix time, then search hard
// ═══════════════════════════════════════════════════════════════════════════

fn baselining_update(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) -> Option<StateId> {
    let baseline_timestamp = match query_location(notecard) {
        Some(sample) => {
            ctx.last_sample = Some(sample);
            sample.timestamp
        }
        None => {
            // Any real fix will differ from zero.
            warn!("BASELINING: location query failed, using baseline 0");
            0
        }
    };

    command_mode(ctx, notecard, PeripheralMode::Continuous);

    ctx.polls = 0;
    ctx.attempt = Some(AcquisitionAttempt::new(
        baseline_timestamp,
        ctx.config.acquisition_timeout_ms(),
    ));
    Some(StateId::Searching)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SEARCHING state: poll until the fix time moves, a stop, or timeout
// ═══════════════════════════════════════════════════════════════════════════

fn searching_enter(ctx: &mut FsmContext, _notecard: &mut dyn NotecardPort) {
    if let Some(attempt) = ctx.attempt {
        info!(
            "SEARCHING: baseline time {}, giving up after {}s",
            attempt.baseline_timestamp, ctx.config.acquisition_timeout_secs
        );
    }
}

fn searching_update(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) -> Option<StateId> {
    let Some(mut attempt) = ctx.attempt else {
        warn!("SEARCHING: no attempt in progress");
        return Some(StateId::TimedOut);
    };
    if attempt.start_ms.is_none() {
        // First reading after the Continuous command went out.
        attempt.start_ms = Some(ctx.now_ms);
        ctx.attempt = Some(attempt);
    }

    if attempt.expired(ctx.now_ms) {
        return Some(StateId::TimedOut);
    }

    ctx.polls += 1;
    let Some(sample) = query_location(notecard) else {
        debug!("SEARCHING: poll {} got no response", ctx.polls);
        ctx.request_delay(ctx.config.poll_interval_ms);
        return None;
    };
    ctx.last_sample = Some(sample);

    // A fresh fix beats a stop marker in the same response.
    if sample.timestamp != attempt.baseline_timestamp {
        let sent = alert::dispatch(notecard, &ctx.config, sample.latitude, sample.longitude);
        ctx.record_dispatch(DispatchReport {
            latitude: sample.latitude,
            longitude: sample.longitude,
            sent,
        });
        return Some(StateId::Delivered);
    }

    if sample.stop {
        return Some(StateId::Stopped);
    }

    ctx.request_delay(ctx.config.poll_interval_ms);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  Terminal states
// ═══════════════════════════════════════════════════════════════════════════

fn delivered_enter(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
    restore_periodic(ctx, notecard);
    end_attempt(ctx, AttemptOutcome::Delivered);
    info!("DELIVERED: alert handed to the Notecard");
}

fn stopped_enter(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
    // The GPS stays continuous unless configured otherwise.
    if ctx.config.restore_mode_on_failure {
        restore_periodic(ctx, notecard);
    }
    end_attempt(ctx, AttemptOutcome::Stopped);
    warn!("STOPPED: Notecard could not resolve a GPS signal");
}

fn timed_out_enter(ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
    if ctx.config.restore_mode_on_failure {
        restore_periodic(ctx, notecard);
    }
    end_attempt(ctx, AttemptOutcome::TimedOut);
    warn!("TIMED_OUT: no new fix within {}s", ctx.config.acquisition_timeout_secs);
}

fn terminal_update(_ctx: &mut FsmContext, _notecard: &mut dyn NotecardPort) -> Option<StateId> {
    Some(StateId::Idle)
}
