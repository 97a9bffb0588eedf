//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial console,
//! future remote commands) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::config::TrackerConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Software equivalent of a button press.
    RequestLocation,

    /// Hot-reload configuration.  Refused while an attempt is running.
    UpdateConfig(TrackerConfig),
}
