//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the response line decoder and
//! asserts that it never panics, never yields an empty or oversized line,
//! and accepts bytes cleanly again after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use kidtracker::notecard::codec::{LineDecoder, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    let mut rest = data;
    while !rest.is_empty() {
        match decoder.feed(rest) {
            Ok(used) => {
                assert!(used <= rest.len(), "consumed more than was fed");
                if let Some(line) = decoder.line() {
                    assert!(!line.is_empty(), "decoder must not yield empty lines");
                    assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
                    assert!(!line.contains(&b'\n'), "terminator leaked into line");
                    decoder.reset();
                }
                rest = &rest[used..];
            }
            Err(_) => {
                assert_eq!(decoder.pending(), 0, "overflow must reset the decoder");
                break;
            }
        }
    }

    decoder.reset();
    let _ = decoder.feed(data);
});
