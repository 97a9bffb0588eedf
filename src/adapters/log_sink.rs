//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{AppEvent, AttemptOutcome};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertDispatched(r) => {
                info!(
                    "ALERT | lat={:.6} lon={:.6} | {}",
                    r.latitude,
                    r.longitude,
                    if r.sent { "queued" } else { "FAILED" }
                );
            }
            AppEvent::AttemptFinished(s) => {
                let outcome = match s.outcome {
                    AttemptOutcome::Delivered => "delivered",
                    AttemptOutcome::Stopped => "stopped",
                    AttemptOutcome::TimedOut => "timed out",
                };
                info!(
                    "ATTEMPT | {} after {} polls, {}ms",
                    outcome, s.polls, s.elapsed_ms
                );
            }
            AppEvent::CommandRejected(reason) => {
                warn!("COMMAND | rejected: {}", reason);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
