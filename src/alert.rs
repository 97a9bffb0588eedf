//! Alert note: format the caregiver message and hand it to the Notecard.
//!
//! The message is a fixed preamble followed by a map link carrying the
//! fix with 12 decimal places.  It is built in a fixed 100-byte buffer;
//! anything that does not fit is cut off rather than failing the alert.

use core::fmt::{self, Write};

use log::{info, warn};

use crate::app::ports::NotecardPort;
use crate::config::TrackerConfig;
use crate::notecard::request::NoteBody;
use crate::notecard::Request;

pub const ALERT_MESSAGE_CAPACITY: usize = 100;

/// Alert text, bounded by [`ALERT_MESSAGE_CAPACITY`].
pub type AlertMessage = heapless::String<ALERT_MESSAGE_CAPACITY>;

const PREAMBLE: &str = "Your kids are requesting you.";
const MAP_URL: &str = "https://maps.google.com/maps?q=";

/// `fmt::Write` adapter that silently drops what does not fit.
struct Truncating<'a>(&'a mut AlertMessage);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Build the alert text for a fix.
pub fn format_message(latitude: f64, longitude: f64) -> AlertMessage {
    let mut msg = AlertMessage::new();
    // Truncating never reports an error.
    let _ = write!(
        Truncating(&mut msg),
        "{PREAMBLE} {MAP_URL}{latitude:.12},{longitude:.12}"
    );
    msg
}

/// A ready-to-send alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub latitude: f64,
    pub longitude: f64,
    pub message: AlertMessage,
}

impl Alert {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            message: format_message(latitude, longitude),
        }
    }

    /// `note.add` to `notefile`, synced immediately.
    pub fn into_request(self, notefile: &heapless::String<32>) -> Request {
        Request::AddNote {
            file: notefile.clone(),
            sync: true,
            body: NoteBody {
                message: self.message,
            },
        }
    }
}

/// Send the alert for a fix.  Returns `false` if the Notecard did not
/// accept the note; the failure is logged and not retried.
pub fn dispatch(
    notecard: &mut dyn NotecardPort,
    config: &TrackerConfig,
    latitude: f64,
    longitude: f64,
) -> bool {
    info!("Location: {latitude:.12}, {longitude:.12}");
    let request = Alert::new(latitude, longitude).into_request(&config.alert_notefile);
    let sent = notecard.send(&request);
    if !sent {
        warn!("ALERT: note.add to {} failed", config.alert_notefile);
    }
    sent
}
