//! Parsed Notecard responses.
//!
//! Responses are kept as a JSON object and read through lenient typed
//! accessors: a missing or mistyped numeric field reads as zero, the
//! same way the Notecard C library's `JGetInt` / `JGetNumber` behave.

use serde_json::{Map, Value};

use crate::error::{NotecardError, Result};

/// One decoded response line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    fields: Map<String, Value>,
}

impl Response {
    /// Parse a response line.  Anything but a JSON object is rejected.
    pub fn parse(line: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(line) {
            Ok(value) => Self::from_value(value),
            Err(_) => Err(NotecardError::DecodeFailed),
        }
    }

    /// Wrap an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(NotecardError::DecodeFailed),
        }
    }

    /// Integer field, truncating floats; zero when absent.
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Floating point field; zero when absent.
    pub fn get_f64(&self, key: &str) -> f64 {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Presence test, regardless of the field's value.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `err` string, if the Notecard rejected the request.
    pub fn error(&self) -> Option<&str> {
        self.fields.get("err").and_then(Value::as_str)
    }
}

/// One `card.location` reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationSample {
    /// Fix time (epoch seconds); unchanged between polls until a new fix.
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// The Notecard gave up resolving a signal.
    pub stop: bool,
}

impl From<&Response> for LocationSample {
    fn from(rsp: &Response) -> Self {
        Self {
            timestamp: rsp.get_i64("time"),
            latitude: rsp.get_f64("lat"),
            longitude: rsp.get_f64("lon"),
            stop: rsp.has("stop"),
        }
    }
}
