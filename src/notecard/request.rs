//! Typed Notecard requests.
//!
//! Each variant maps to one Notecard API and is serialized with its
//! name in the `req` field, e.g.
//! `{"req":"card.location.mode","mode":"continuous"}`.

use serde::Serialize;

use crate::alert::AlertMessage;

/// Every request the firmware issues to the Notecard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "req")]
pub enum Request {
    /// Query the last known location and GPS status.
    #[serde(rename = "card.location")]
    LocationStatus,

    /// Switch the GPS between periodic and continuous sampling.
    #[serde(rename = "card.location.mode")]
    SetLocationMode {
        mode: LocationModeName,
        #[serde(skip_serializing_if = "Option::is_none")]
        seconds: Option<u32>,
    },

    /// Queue a note for upload.
    #[serde(rename = "note.add")]
    AddNote {
        file: heapless::String<32>,
        sync: bool,
        body: NoteBody,
    },

    /// Notehub product and sync cadence.
    #[serde(rename = "hub.set")]
    HubSet {
        product: heapless::String<64>,
        mode: &'static str,
        inbound: u32,
        outbound: u32,
    },

    /// Report the host firmware version to Notehub.
    #[serde(rename = "dfu.status")]
    DfuStatus { version: String },

    /// Enable Notecard Outboard Firmware Update.
    #[serde(rename = "card.dfu")]
    CardDfu { on: bool, name: &'static str },

    /// Temperature sampling interval.
    #[serde(rename = "card.temp")]
    CardTemp { minutes: u32 },

    /// AUX pin behaviour.
    #[serde(rename = "card.aux")]
    CardAux { mode: &'static str },

    /// Location tracking with heartbeat.
    #[serde(rename = "card.location.track")]
    LocationTrack {
        start: bool,
        heartbeat: bool,
        hours: u32,
    },
}

impl Request {
    /// The Notecard API name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocationStatus => "card.location",
            Self::SetLocationMode { .. } => "card.location.mode",
            Self::AddNote { .. } => "note.add",
            Self::HubSet { .. } => "hub.set",
            Self::DfuStatus { .. } => "dfu.status",
            Self::CardDfu { .. } => "card.dfu",
            Self::CardTemp { .. } => "card.temp",
            Self::CardAux { .. } => "card.aux",
            Self::LocationTrack { .. } => "card.location.track",
        }
    }
}

/// `body` of an alert note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteBody {
    pub message: AlertMessage,
}

/// Wire names accepted by `card.location.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationModeName {
    Periodic,
    Continuous,
}

/// GPS sampling policy of the Notecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralMode {
    /// Low-power scheduled sampling; `None` keeps the Notecard's interval.
    Periodic { seconds: Option<u32> },
    /// Continuous aggressive search.
    Continuous,
}

impl PeripheralMode {
    pub fn periodic(seconds: u32) -> Self {
        Self::Periodic {
            seconds: Some(seconds),
        }
    }

    /// The `card.location.mode` request that selects this mode.
    pub fn to_request(self) -> Request {
        match self {
            Self::Periodic { seconds } => Request::SetLocationMode {
                mode: LocationModeName::Periodic,
                seconds,
            },
            Self::Continuous => Request::SetLocationMode {
                mode: LocationModeName::Continuous,
                seconds: None,
            },
        }
    }
}
