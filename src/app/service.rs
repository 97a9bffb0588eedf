//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the acquisition FSM and its shared context.  It
//! exposes a hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, so the whole acquisition flow runs under test
//! with scripted adapters.
//!
//! ```text
//!  NotecardPort ◀─▶ ┌────────────────────────┐ ──▶ EventSink
//!                   │       AppService        │
//!         Clock ──▶ │  FSM · attempt context  │
//!                   └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::TrackerConfig;
use crate::drivers::button::RequestFlag;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::commands::AppCommand;
use super::events::{AppEvent, AttemptSummary};
use super::ports::{Clock, EventSink, NotecardPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates the acquisition flow.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration and the flag the button
    /// ISR raises.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: TrackerConfig, request: &'static RequestFlag) -> Self {
        let ctx = FsmContext::new(config, request);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);
        Self {
            fsm,
            ctx,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial state (Idle).
    pub fn start(&mut self, notecard: &mut impl NotecardPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx, notecard);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one FSM step, publish what happened, then block for any delay
    /// the step asked for.  Returns the state after the step.
    pub fn tick(
        &mut self,
        notecard: &mut impl NotecardPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> StateId {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Stamp the context with the current time
        self.ctx.now_ms = clock.now_ms();

        // 2. FSM tick (may perform Notecard round trips)
        self.fsm.tick(&mut self.ctx, notecard);

        // 3. Publish outputs in the order they happened
        if let Some(report) = self.ctx.take_dispatch() {
            sink.emit(&AppEvent::AlertDispatched(report));
        }
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
        if let Some(summary) = self.ctx.take_summary() {
            sink.emit(&AppEvent::AttemptFinished(summary));
        }

        // 4. Poll spacing
        let delay = self.ctx.take_delay();
        if delay > 0 {
            clock.delay_ms(delay);
        }

        new_state
    }

    /// Drive one complete acquisition attempt if a request is pending.
    ///
    /// Ticks until the FSM is back in Idle and returns the attempt's
    /// summary.  Returns `None` without touching the Notecard when no
    /// request is pending.
    pub fn run_attempt(
        &mut self,
        notecard: &mut impl NotecardPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Option<AttemptSummary> {
        if self.fsm.current_state() == StateId::Idle && !self.ctx.request_pending() {
            return None;
        }

        let mut summary = None;
        let mut recorder = SummaryTap {
            inner: sink,
            summary: &mut summary,
        };
        loop {
            if self.tick(notecard, clock, &mut recorder) == StateId::Idle {
                break;
            }
        }
        summary
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    ///
    /// Config updates may only touch settings the acquisition flow reads
    /// live; see [`TrackerConfig::boot_only_change`].
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::RequestLocation => {
                self.ctx.request_flag().set();
                info!("Location requested by command");
            }
            AppCommand::UpdateConfig(new_config) => {
                if self.fsm.current_state() != StateId::Idle {
                    warn!("Config update refused: attempt in progress");
                    sink.emit(&AppEvent::CommandRejected("attempt in progress"));
                    return;
                }
                if let Err(reason) = new_config.validate() {
                    warn!("Config update refused: {reason}");
                    sink.emit(&AppEvent::CommandRejected(reason));
                    return;
                }
                if let Some(field) = self.ctx.config.boot_only_change(&new_config) {
                    warn!("Config update refused: {field} only applies at boot");
                    sink.emit(&AppEvent::CommandRejected("boot-only setting changed"));
                    return;
                }
                self.ctx.config = new_config;
                info!("Configuration updated at runtime");
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Live configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.ctx.config
    }

    /// Whether a location request is waiting to be served.
    pub fn request_pending(&self) -> bool {
        self.ctx.request_pending()
    }
}

/// Forwards events while catching the attempt summary.
struct SummaryTap<'a, S: EventSink> {
    inner: &'a mut S,
    summary: &'a mut Option<AttemptSummary>,
}

impl<S: EventSink> EventSink for SummaryTap<'_, S> {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::AttemptFinished(summary) = event {
            *self.summary = Some(*summary);
        }
        self.inner.emit(event);
    }
}
