//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard the acquisition handlers read from and
//! write to: timing, configuration, the request flag, the running
//! attempt, and the reports the service turns into events after each tick.

use crate::app::events::{AttemptOutcome, AttemptSummary, DispatchReport};
use crate::config::TrackerConfig;
use crate::drivers::button::RequestFlag;
use crate::notecard::{LocationSample, PeripheralMode};

// ---------------------------------------------------------------------------
// Acquisition attempt
// ---------------------------------------------------------------------------

/// Transient state of one acquisition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionAttempt {
    /// Fix time reported before the search started.  A poll with any other
    /// time is a new fix.
    pub baseline_timestamp: i64,
    /// Monotonic start of the search (ms since boot).  Stamped on the first
    /// searching tick, after the GPS was switched to continuous.
    pub start_ms: Option<u64>,
    /// Search budget (ms).
    pub timeout_ms: u64,
}

impl AcquisitionAttempt {
    /// Attempt that has a baseline but whose clock has not started yet.
    pub fn new(baseline_timestamp: i64, timeout_ms: u64) -> Self {
        Self {
            baseline_timestamp,
            start_ms: None,
            timeout_ms,
        }
    }

    /// Zero until the clock has started.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        self.start_ms.map_or(0, |start| now_ms.saturating_sub(start))
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.timeout_ms
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Clock reading taken right before this tick (ms since boot).
    pub now_ms: u64,

    // -- Configuration --
    pub config: TrackerConfig,

    // -- Acquisition --
    request: &'static RequestFlag,
    /// The running attempt, if any.
    pub attempt: Option<AcquisitionAttempt>,
    /// Polls issued in the current attempt.
    pub polls: u32,
    /// Most recent successful `card.location` reading.
    pub last_sample: Option<LocationSample>,
    /// Last mode the FSM commanded (`None` until the first command).
    pub commanded_mode: Option<PeripheralMode>,

    // -- Outputs (consumed by the service after each tick) --
    /// Blocking delay requested before the next tick (ms).
    pending_delay_ms: u32,
    dispatch: Option<DispatchReport>,
    summary: Option<AttemptSummary>,
}

impl FsmContext {
    /// Create a new context bound to `request`.
    pub fn new(config: TrackerConfig, request: &'static RequestFlag) -> Self {
        Self {
            now_ms: 0,
            config,
            request,
            attempt: None,
            polls: 0,
            last_sample: None,
            commanded_mode: None,
            pending_delay_ms: 0,
            dispatch: None,
            summary: None,
        }
    }

    // -- Request flag --

    pub fn request_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn clear_request(&self) {
        self.request.clear();
    }

    pub fn request_flag(&self) -> &'static RequestFlag {
        self.request
    }

    // -- Outputs --

    /// Ask the service to block for `ms` before the next tick.
    pub fn request_delay(&mut self, ms: u32) {
        self.pending_delay_ms = ms;
    }

    pub fn take_delay(&mut self) -> u32 {
        core::mem::take(&mut self.pending_delay_ms)
    }

    pub fn record_dispatch(&mut self, report: DispatchReport) {
        self.dispatch = Some(report);
    }

    pub fn take_dispatch(&mut self) -> Option<DispatchReport> {
        self.dispatch.take()
    }

    /// Close the running attempt with `outcome`.
    pub fn finish_attempt(&mut self, outcome: AttemptOutcome) {
        let elapsed_ms = self
            .attempt
            .map_or(0, |a| a.elapsed_ms(self.now_ms));
        self.summary = Some(AttemptSummary {
            outcome,
            polls: self.polls,
            elapsed_ms,
        });
        self.attempt = None;
    }

    pub fn take_summary(&mut self) -> Option<AttemptSummary> {
        self.summary.take()
    }
}
