//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// An alert note was handed to the Notecard.
    AlertDispatched(DispatchReport),

    /// An acquisition attempt reached a terminal state.
    AttemptFinished(AttemptSummary),

    /// A command was refused (e.g. config change mid-attempt).
    CommandRejected(&'static str),
}

/// Result of one alert dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchReport {
    pub latitude: f64,
    pub longitude: f64,
    /// `false` when the Notecard rejected or never received the note.
    pub sent: bool,
}

/// How an acquisition attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Delivered,
    Stopped,
    TimedOut,
}

/// Summary of a finished acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptSummary {
    pub outcome: AttemptOutcome,
    /// `card.location` polls issued while searching.
    pub polls: u32,
    /// Time from entering Searching to the terminal state.
    pub elapsed_ms: u64,
}
