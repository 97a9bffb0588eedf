//! Mock hardware adapters for integration tests.
//!
//! `MockNotecard` sits under the real [`NotecardClient`] as a byte
//! transport: it decodes every request line, records it, and queues the
//! reply line the test scripted.  The whole wire path is exercised
//! without a UART.

use std::collections::{HashMap, VecDeque};

use kidtracker::app::events::AppEvent;
use kidtracker::app::ports::{Clock, EventSink};
use kidtracker::notecard::transport::Transport;
use serde_json::{Value, json};

// ── MockNotecard ──────────────────────────────────────────────

/// Scripted Notecard speaking the newline-delimited JSON protocol.
pub struct MockNotecard {
    /// Every decoded request, in order.
    pub requests: Vec<Value>,
    /// Replies to `card.location`, front first.  `None` = stay silent.
    locations: VecDeque<Option<Value>>,
    /// Reply once `locations` runs dry.  `None` = stay silent.
    pub location_fallback: Option<Value>,
    /// `err` strings for requests the card should reject, by name.
    rejects: HashMap<&'static str, &'static str>,
    tx: Vec<u8>,
    rx: VecDeque<u8>,
}

#[allow(dead_code)]
impl MockNotecard {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            locations: VecDeque::new(),
            location_fallback: None,
            rejects: HashMap::new(),
            tx: Vec::new(),
            rx: VecDeque::new(),
        }
    }

    /// Queue one `card.location` fix reply.
    pub fn fix(&mut self, time: i64, lat: f64, lon: f64) -> &mut Self {
        self.locations
            .push_back(Some(json!({"time": time, "lat": lat, "lon": lon})));
        self
    }

    /// Queue one `card.location` reply carrying the stop marker.
    pub fn stop(&mut self, time: i64) -> &mut Self {
        self.locations
            .push_back(Some(json!({"time": time, "stop": true})));
        self
    }

    /// Queue one raw `card.location` reply.
    pub fn reply(&mut self, reply: Value) -> &mut Self {
        self.locations.push_back(Some(reply));
        self
    }

    /// Queue one `card.location` that never gets an answer.
    pub fn silence(&mut self) -> &mut Self {
        self.locations.push_back(None);
        self
    }

    /// Answer every `name` request with `{"err": err}`.
    pub fn reject(&mut self, name: &'static str, err: &'static str) -> &mut Self {
        self.rejects.insert(name, err);
        self
    }

    /// Names of all requests seen, in order.
    pub fn names(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|r| r["req"].as_str())
            .collect()
    }

    /// Requests other than `card.location` polls.
    pub fn commands(&self) -> Vec<&Value> {
        self.requests
            .iter()
            .filter(|r| r["req"] != "card.location")
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.requests.iter().filter(|r| r["req"] == name).count()
    }

    fn answer(&mut self, request: &Value) -> Option<Value> {
        let name = request["req"].as_str().unwrap_or_default();
        if let Some(err) = self.rejects.get(name) {
            return Some(json!({ "err": err }));
        }
        if name == "card.location" {
            return match self.locations.pop_front() {
                Some(reply) => reply,
                None => self.location_fallback.clone(),
            };
        }
        Some(json!({}))
    }
}

impl Transport for MockNotecard {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.rx.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or_default();
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        for &byte in data {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.tx);
                let request: Value =
                    serde_json::from_slice(&line).expect("client wrote invalid JSON");
                let reply = self.answer(&request);
                self.requests.push(request);
                if let Some(reply) = reply {
                    self.rx.extend(serde_json::to_vec(&reply).unwrap());
                    self.rx.push_back(b'\n');
                }
            } else {
                self.tx.push(byte);
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), ()> {
        self.rx.clear();
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Simulated time: delays advance the clock instantly.
pub struct MockClock {
    pub now: u64,
    pub delays: Vec<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now: 0,
            delays: Vec::new(),
        }
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now += u64::from(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
