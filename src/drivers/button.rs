//! Location-request button: ISR-safe request flag with debounce.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up. GPIO fires on falling edge;
//! the ISR calls [`button_isr_handler`], which only touches atomics: it
//! debounces the edge against the previous accepted one and raises the
//! process-wide [`LOCATION_REQUEST`] flag.
//!
//! ## Flag lifecycle
//!
//! | Who                  | Action                                  |
//! |----------------------|-----------------------------------------|
//! | Button ISR           | set (any time, coalesced)               |
//! | FSM `Idle`           | read once per tick                      |
//! | FSM terminal states  | clear at the end of every attempt       |
//!
//! Presses while an attempt runs only re-set an already-set flag, so they
//! never queue a second attempt.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::InputPin;

const DEBOUNCE_MS: u32 = 50;

/// Single-bit "location requested" flag shared by ISR and main loop.
pub struct RequestFlag {
    pending: AtomicBool,
    /// Timestamp of the last accepted edge (ms since boot, wrapping).
    last_edge_ms: AtomicU32,
    /// Accepted edges since boot.
    edges: AtomicU32,
}

impl Default for RequestFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            last_edge_ms: AtomicU32::new(0),
            edges: AtomicU32::new(0),
        }
    }

    /// Record a falling edge at `now_ms`.  Returns `false` if the edge fell
    /// inside the debounce window and was ignored.
    ///
    /// Lock-free and allocation-free; safe from interrupt context.
    pub fn on_falling_edge(&self, now_ms: u32) -> bool {
        let seen = self.edges.load(Ordering::Relaxed);
        let last = self.last_edge_ms.load(Ordering::Relaxed);
        if seen != 0 && now_ms.wrapping_sub(last) < DEBOUNCE_MS {
            return false;
        }
        self.last_edge_ms.store(now_ms, Ordering::Relaxed);
        self.edges.store(seen.wrapping_add(1), Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Raise the flag without debounce (software trigger).
    pub fn set(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Whether a location request is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Drop the pending request.  Only the acquisition FSM calls this.
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }

    /// Debounced edges accepted since boot.
    pub fn edge_count(&self) -> u32 {
        self.edges.load(Ordering::Relaxed)
    }
}

/// The device's one location-request flag.
pub static LOCATION_REQUEST: RequestFlag = RequestFlag::new();

/// ISR handler: register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic stores only).
pub fn button_isr_handler(now_ms: u32) {
    LOCATION_REQUEST.on_falling_edge(now_ms);
}

/// Level-polling fallback for when the GPIO interrupt could not be
/// installed.  Call once per main-loop iteration.
pub struct TriggerButton<P: InputPin> {
    pin: P,
    was_low: bool,
}

impl<P: InputPin> TriggerButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            was_low: false,
        }
    }

    /// Sample the pin and feed a high→low transition into `flag`.
    /// A pin read error counts as "not pressed".
    pub fn poll(&mut self, flag: &RequestFlag, now_ms: u32) -> bool {
        let low = self.pin.is_low().unwrap_or(false);
        let falling = low && !self.was_low;
        self.was_low = low;
        falling && flag.on_falling_edge(now_ms)
    }
}
