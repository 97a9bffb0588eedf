//! System configuration parameters
//!
//! All tunable parameters for the Kid Tracker.  The acquisition timings
//! and the provisioning values pushed to the Notecard at boot live here.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Notehub product identifier this device is provisioned against.
pub const PRODUCT_UID: &str = "com.blues.tj:kidtracker";

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    // --- Acquisition ---
    /// Give up looking for a fresh fix after this long (seconds)
    pub acquisition_timeout_secs: u32,
    /// Delay between two `card.location` polls while searching (milliseconds)
    pub poll_interval_ms: u32,
    /// Periodic GPS sampling interval restored after an attempt (seconds)
    pub location_periodic_secs: u32,
    /// Restore periodic mode after a stop marker or timeout as well.
    /// Off by default: only a delivered fix restores the mode.
    pub restore_mode_on_failure: bool,

    // --- Alert ---
    /// Notefile the alert is added to
    pub alert_notefile: String<32>,

    // --- Notehub / provisioning ---
    /// Notehub product UID
    pub product_uid: String<64>,
    /// Inbound sync cadence (minutes)
    pub hub_inbound_mins: u32,
    /// Outbound sync cadence (minutes)
    pub hub_outbound_mins: u32,
    /// Temperature sampling interval (minutes)
    pub temperature_mins: u32,
    /// Location tracking heartbeat (hours)
    pub track_heartbeat_hours: u32,

    // --- Timing (read once at boot) ---
    /// Main loop sleep while idle (milliseconds)
    pub idle_loop_interval_ms: u32,
    /// How long the client waits for a Notecard response line (milliseconds)
    pub response_timeout_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            // Acquisition
            acquisition_timeout_secs: 600,
            poll_interval_ms: 2_000,
            location_periodic_secs: 60 * 2,
            restore_mode_on_failure: false,

            // Alert
            alert_notefile: fixed_str("alert.qo"),

            // Notehub
            product_uid: fixed_str(PRODUCT_UID),
            hub_inbound_mins: 60 * 12,
            hub_outbound_mins: 10,
            temperature_mins: 60,
            track_heartbeat_hours: 12,

            // Timing
            idle_loop_interval_ms: 50,
            response_timeout_ms: 5_000,
            watchdog_timeout_ms: 30_000,
        }
    }
}

impl TrackerConfig {
    /// Acquisition timeout in milliseconds.
    pub fn acquisition_timeout_ms(&self) -> u64 {
        u64::from(self.acquisition_timeout_secs) * 1000
    }

    /// Reject values that would stall or spin the main loop.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.acquisition_timeout_secs == 0 {
            return Err("acquisition_timeout_secs must be non-zero");
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be non-zero");
        }
        if u64::from(self.poll_interval_ms) >= self.acquisition_timeout_ms() {
            return Err("poll_interval_ms must be shorter than the acquisition timeout");
        }
        if self.alert_notefile.is_empty() {
            return Err("alert_notefile must not be empty");
        }
        if u64::from(self.watchdog_timeout_ms) <= self.worst_tick_ms() {
            return Err("watchdog_timeout_ms must exceed the longest tick");
        }
        Ok(())
    }

    /// Upper bound on one service tick between watchdog feeds: a poll delay
    /// plus three Notecard round trips (poll, `note.add`, mode restore).
    pub fn worst_tick_ms(&self) -> u64 {
        u64::from(self.poll_interval_ms) + 3 * u64::from(self.response_timeout_ms)
    }

    /// First setting that differs from `other` and is only read at boot:
    /// UART timeout, watchdog, loop pacing and the provisioning values.
    pub fn boot_only_change(&self, other: &Self) -> Option<&'static str> {
        if self.response_timeout_ms != other.response_timeout_ms {
            Some("response_timeout_ms")
        } else if self.watchdog_timeout_ms != other.watchdog_timeout_ms {
            Some("watchdog_timeout_ms")
        } else if self.idle_loop_interval_ms != other.idle_loop_interval_ms {
            Some("idle_loop_interval_ms")
        } else if self.product_uid != other.product_uid {
            Some("product_uid")
        } else if self.hub_inbound_mins != other.hub_inbound_mins
            || self.hub_outbound_mins != other.hub_outbound_mins
        {
            Some("hub sync cadence")
        } else if self.temperature_mins != other.temperature_mins {
            Some("temperature_mins")
        } else if self.track_heartbeat_hours != other.track_heartbeat_hours {
            Some("track_heartbeat_hours")
        } else {
            None
        }
    }
}

fn fixed_str<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
