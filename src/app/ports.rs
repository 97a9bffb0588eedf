//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (Notecard client, clock, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the acquisition core never touches a UART or a timer directly.

use crate::notecard::{Request, Response};

// ───────────────────────────────────────────────────────────────
// Notecard port (driven adapter: domain ↔ location peripheral)
// ───────────────────────────────────────────────────────────────

/// Request/response access to the Notecard.
///
/// Implementations are not reentrant: only one call may be outstanding.
/// Neither method retries.
pub trait NotecardPort {
    /// Fire-and-forget.  `false` means the request was rejected or could
    /// not be delivered; the caller drops it and carries on.
    fn send(&mut self, request: &Request) -> bool;

    /// Blocking round trip.  `None` means the transport failed.
    fn request_and_response(&mut self, request: &Request) -> Option<Response>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain → system timer)
// ───────────────────────────────────────────────────────────────

/// Monotonic time and blocking delays.
pub trait Clock {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
