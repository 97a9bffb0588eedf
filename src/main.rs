//! Kid Tracker Firmware — Main Entry Point
//!
//! Press the button, get a fresh GPS fix, text the caregiver a map link.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  NotecardClient<UartTransport>   LogEventSink   Esp32Clock     │
//! │  (NotecardPort)                  (EventSink)    (Clock)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Acquisition FSM · request flag                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button ISR ──▶ LOCATION_REQUEST (atomic) ──▶ FSM Idle         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

use kidtracker::adapters::log_sink::LogEventSink;
use kidtracker::adapters::time::Esp32Clock;
use kidtracker::adapters::uart_transport::UartTransport;
use kidtracker::app::ports::Clock;
use kidtracker::app::service::AppService;
use kidtracker::config::TrackerConfig;
use kidtracker::drivers::button::{LOCATION_REQUEST, TriggerButton};
use kidtracker::drivers::{hw_init, watchdog::Watchdog};
use kidtracker::firmware;
use kidtracker::fsm::StateId;
use kidtracker::notecard::NotecardClient;
use kidtracker::{pins, provisioning};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  {}  {:<24}║", firmware::DISPLAY_NAME, firmware::product_version());
    info!("╚══════════════════════════════════════╝");

    let config = TrackerConfig::default();
    if let Err(reason) = config.validate() {
        anyhow::bail!("invalid configuration: {reason}");
    }

    // ── 2. Button: interrupt, or level polling as a fallback ──
    hw_init::init_peripherals()?;
    let mut fallback_button = match hw_init::init_isr_service() {
        Ok(()) => None,
        Err(e) => {
            warn!("Button ISR unavailable ({}), polling the pin instead", e);
            // SAFETY: the pin is not driven by anything else; the GPIO ISR
            // path that would share it failed to install.
            let pin = unsafe { AnyIOPin::new(pins::BUTTON_GPIO) };
            let mut driver: PinDriver<'_, AnyIOPin, Input> = PinDriver::input(pin)?;
            driver.set_pull(Pull::Up)?;
            Some(TriggerButton::new(driver))
        }
    };

    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 3. Notecard link + provisioning ───────────────────────
    let transport = UartTransport::new(config.response_timeout_ms)?;
    let mut notecard = NotecardClient::new(transport);
    let report = provisioning::provision(&mut notecard, &config);
    if !report.is_complete() {
        warn!("Notecard only partly provisioned; continuing");
    }

    // ── 4. Construct app service ──────────────────────────────
    let mut clock = Esp32Clock::new();
    let mut log_sink = LogEventSink::new();
    let idle_interval = config.idle_loop_interval_ms;
    let mut app = AppService::new(config, &LOCATION_REQUEST);
    app.start(&mut notecard, &mut log_sink);

    info!("System ready. Press the button to send a location.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        if let Some(button) = fallback_button.as_mut() {
            button.poll(&LOCATION_REQUEST, clock.now_ms() as u32);
        }

        let state = app.tick(&mut notecard, &mut clock, &mut log_sink);

        watchdog.feed();

        if state == StateId::Idle {
            clock.delay_ms(idle_interval);
        }
    }
}
