//! Application layer — hexagonal core of the Kid Tracker.
//!
//! - [`ports`]    — trait boundaries (Notecard, clock, event sink)
//! - [`service`]  — [`AppService`](service::AppService) drives the acquisition FSM
//! - [`commands`] — inbound commands
//! - [`events`]   — outbound events

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
