//! Integration tests for the boot-time Notecard provisioning flow.
//!
//! Runs `provision()` over the real client and checks what actually went
//! out on the wire.

use kidtracker::config::TrackerConfig;
use kidtracker::notecard::NotecardClient;
use kidtracker::provisioning::{ProvisioningReport, provision};
use serde_json::{Value, json};

use crate::mock_hw::MockNotecard;

#[test]
fn provisions_all_seven_settings_in_order() {
    let mut client = NotecardClient::new(MockNotecard::new());
    let report = provision(&mut client, &TrackerConfig::default());

    assert_eq!(report, ProvisioningReport { sent: 7, failed: 0 });
    assert!(report.is_complete());

    let card = client.transport();
    assert_eq!(
        card.names(),
        [
            "hub.set",
            "dfu.status",
            "card.dfu",
            "card.temp",
            "card.aux",
            "card.location.mode",
            "card.location.track",
        ]
    );
    let r = &card.requests;
    assert_eq!(
        r[0],
        json!({
            "req": "hub.set",
            "product": "com.blues.tj:kidtracker",
            "mode": "periodic",
            "inbound": 720,
            "outbound": 10
        })
    );
    assert_eq!(r[2], json!({"req": "card.dfu", "on": true, "name": "stm32"}));
    assert_eq!(r[3], json!({"req": "card.temp", "minutes": 60}));
    assert_eq!(r[4], json!({"req": "card.aux", "mode": "dfu"}));
    assert_eq!(
        r[5],
        json!({"req": "card.location.mode", "mode": "periodic", "seconds": 120})
    );
    assert_eq!(
        r[6],
        json!({"req": "card.location.track", "start": true, "heartbeat": true, "hours": 12})
    );
}

#[test]
fn dfu_status_carries_firmware_identity() {
    let mut client = NotecardClient::new(MockNotecard::new());
    provision(&mut client, &TrackerConfig::default());

    let dfu = &client.transport().requests[1];
    let version: Value =
        serde_json::from_str(dfu["version"].as_str().expect("version is a string")).unwrap();
    assert_eq!(version["org"], "tvantoll");
    assert_eq!(version["product"], "Kid Tracker");
    assert_eq!(version["firmware"], "kid-tracker-firmware");
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(version["ver_build"], 0);
}

#[test]
fn one_rejection_does_not_stop_the_rest() {
    let mut card = MockNotecard::new();
    card.reject("card.aux", "aux: not supported");
    let mut client = NotecardClient::new(card);

    let report = provision(&mut client, &TrackerConfig::default());
    assert_eq!(report, ProvisioningReport { sent: 6, failed: 1 });
    assert!(!report.is_complete());
    assert_eq!(client.transport().requests.len(), 7);
}

#[test]
fn configured_cadence_reaches_the_wire() {
    let config = TrackerConfig {
        hub_outbound_mins: 30,
        location_periodic_secs: 600,
        ..TrackerConfig::default()
    };
    let mut client = NotecardClient::new(MockNotecard::new());
    provision(&mut client, &config);

    let r = &client.transport().requests;
    assert_eq!(r[0]["outbound"], 30);
    assert_eq!(r[5]["seconds"], 600);
}
