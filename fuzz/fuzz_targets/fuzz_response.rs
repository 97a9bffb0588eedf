//! Fuzz target: `Response::parse` and the location reading built from it.
//!
//! cargo fuzz run fuzz_response

#![no_main]

use kidtracker::notecard::{LocationSample, Response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rsp) = Response::parse(data) {
        let sample = LocationSample::from(&rsp);
        // Presence of the key is all that matters for the stop marker.
        assert_eq!(sample.stop, rsp.has("stop"));
        let _ = rsp.error();
    }
});
