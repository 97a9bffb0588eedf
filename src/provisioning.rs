//! One-time Notecard setup at boot.
//!
//! Every request is independent: a failure is logged and the next request
//! is still sent.  The device keeps running with whatever the Notecard
//! accepted.

use log::{info, warn};

use crate::app::ports::NotecardPort;
use crate::config::TrackerConfig;
use crate::firmware::ProductInfo;
use crate::notecard::{PeripheralMode, Request};

/// Outcome of a provisioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvisioningReport {
    pub sent: u8,
    pub failed: u8,
}

impl ProvisioningReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// The boot-time requests, in the order they are sent.
pub fn provisioning_requests(config: &TrackerConfig) -> [Request; 7] {
    [
        Request::HubSet {
            product: config.product_uid.clone(),
            mode: "periodic",
            inbound: config.hub_inbound_mins,
            outbound: config.hub_outbound_mins,
        },
        Request::DfuStatus {
            version: ProductInfo::current().to_json(),
        },
        Request::CardDfu {
            on: true,
            name: "stm32",
        },
        Request::CardTemp {
            minutes: config.temperature_mins,
        },
        Request::CardAux { mode: "dfu" },
        PeripheralMode::periodic(config.location_periodic_secs).to_request(),
        Request::LocationTrack {
            start: true,
            heartbeat: true,
            hours: config.track_heartbeat_hours,
        },
    ]
}

/// Send every provisioning request once.
pub fn provision(notecard: &mut impl NotecardPort, config: &TrackerConfig) -> ProvisioningReport {
    let mut report = ProvisioningReport::default();
    for request in provisioning_requests(config) {
        if notecard.send(&request) {
            report.sent += 1;
        } else {
            report.failed += 1;
            warn!("Provisioning: {} failed, continuing", request.name());
        }
    }
    info!(
        "Provisioning: {} sent, {} failed",
        report.sent, report.failed
    );
    report
}
