//! Notecard protocol client.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Notecard stack                         │
//! │                                                           │
//! │  Request ──▶ codec (JSON line) ──▶ Transport (UART) ──┐   │
//! │                                                      │   │
//! │  Response ◀── codec (line decoder) ◀── Transport ◀───┘   │
//! │                                                           │
//! │  NotecardClient: send() / request_and_response()          │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod codec;
pub mod request;
pub mod response;
pub mod transport;

pub use client::NotecardClient;
pub use request::{PeripheralMode, Request};
pub use response::{LocationSample, Response};
