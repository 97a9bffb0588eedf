//! Error types for the Kid Tracker firmware.
//!
//! Every failure in the Notecard link funnels into [`NotecardError`].  The
//! acquisition core never propagates these upward: the client collapses them
//! into the `bool` / `Option` contract of its port, and the caller logs them.
//! All variants are `Copy` so they can be logged and compared without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Notecard link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotecardError {
    /// The transport refused or failed a write.
    WriteFailed,
    /// The transport failed while reading.
    ReadFailed,
    /// No complete response line arrived within the receive timeout.
    ResponseTimeout,
    /// A response line exceeded the decoder buffer.
    LineTooLong,
    /// The request could not be serialized.
    EncodeFailed,
    /// The response line was not a JSON object.
    DecodeFailed,
    /// The Notecard answered with an `err` field.
    Rejected,
}

impl fmt::Display for NotecardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "transport write failed"),
            Self::ReadFailed => write!(f, "transport read failed"),
            Self::ResponseTimeout => write!(f, "no response before timeout"),
            Self::LineTooLong => write!(f, "response line too long"),
            Self::EncodeFailed => write!(f, "request encode failed"),
            Self::DecodeFailed => write!(f, "response is not a JSON object"),
            Self::Rejected => write!(f, "request rejected by Notecard"),
        }
    }
}

impl core::error::Error for NotecardError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Result alias for the Notecard link.
pub type Result<T> = core::result::Result<T, NotecardError>;
