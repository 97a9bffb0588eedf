//! GPIO / peripheral pin assignments for the Kid Tracker board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Location-request button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button the child presses to request a caregiver.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Notecard serial link
// ---------------------------------------------------------------------------

/// UART peripheral wired to the Notecard.
pub const NOTECARD_UART_NUM: i32 = 1;
/// ESP32 TX → Notecard RX.
pub const NOTECARD_UART_TX_GPIO: i32 = 17;
/// ESP32 RX ← Notecard TX.
pub const NOTECARD_UART_RX_GPIO: i32 = 18;
/// Notecard serial default.
pub const NOTECARD_UART_BAUD: u32 = 9_600;
/// Driver receive ring buffer (bytes).
pub const NOTECARD_UART_RX_BUF: i32 = 2_048;
