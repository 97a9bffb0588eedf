//! Newline-delimited JSON line codec.
//!
//! Wire format (Notecard serial protocol):
//! ```text
//! {"req":"card.location"}\n          ──▶ Notecard
//! {"time":1700000000,"lat":..}\r\n   ◀── Notecard
//! ```
//!
//! The decoder accumulates incoming bytes into a fixed buffer and yields
//! one complete line at a time.  A single `Transport::read` may return
//! part of a line, so the decoder keeps state across calls.  Carriage
//! returns are dropped and blank lines are skipped.

use heapless::Vec;
use serde::Serialize;

use crate::error::{NotecardError, Result};

/// Maximum response line length (protects against memory exhaustion).
pub const MAX_LINE_LEN: usize = 1024;

/// Line terminator used by the Notecard in both directions.
const TERMINATOR: u8 = b'\n';

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8, MAX_LINE_LEN>,
    complete: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            complete: false,
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Returns how many bytes of `data` were consumed.  Consumption stops
    /// right after a terminator that completes a non-empty line; the line
    /// is then available from [`line`](Self::line) until the next
    /// [`reset`](Self::reset).
    ///
    /// A line longer than [`MAX_LINE_LEN`] resets the decoder and fails
    /// with [`NotecardError::LineTooLong`].
    pub fn feed(&mut self, data: &[u8]) -> Result<usize> {
        if self.complete {
            return Ok(0);
        }

        for (i, &byte) in data.iter().enumerate() {
            match byte {
                TERMINATOR if self.buf.is_empty() => {}
                TERMINATOR => {
                    self.complete = true;
                    return Ok(i + 1);
                }
                b'\r' => {}
                _ => {
                    if self.buf.push(byte).is_err() {
                        self.reset();
                        return Err(NotecardError::LineTooLong);
                    }
                }
            }
        }

        Ok(data.len())
    }

    /// The completed line, without its terminator.
    pub fn line(&self) -> Option<&[u8]> {
        self.complete.then_some(self.buf.as_slice())
    }

    /// Bytes buffered towards the current (incomplete) line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Discard any partial or completed line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.complete = false;
    }
}

/// Encode a request as one JSON line, terminator included.
pub fn encode_line<T: Serialize>(request: &T) -> Result<std::vec::Vec<u8>> {
    let mut out = serde_json::to_vec(request).map_err(|_| NotecardError::EncodeFailed)?;
    out.push(TERMINATOR);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_in_one_chunk() {
        let mut d = LineDecoder::new();
        let used = d.feed(b"{\"time\":5}\r\n").unwrap();
        assert_eq!(used, 12);
        assert_eq!(d.line(), Some(&b"{\"time\":5}"[..]));
    }

    #[test]
    fn line_split_across_chunks() {
        let mut d = LineDecoder::new();
        assert_eq!(d.feed(b"{\"ti").unwrap(), 4);
        assert!(d.line().is_none());
        assert_eq!(d.pending(), 4);
        d.feed(b"me\":5}\n").unwrap();
        assert_eq!(d.line(), Some(&b"{\"time\":5}"[..]));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut d = LineDecoder::new();
        d.feed(b"\r\n\n{}\n").unwrap();
        assert_eq!(d.line(), Some(&b"{}"[..]));
    }

    #[test]
    fn stops_after_first_complete_line() {
        let mut d = LineDecoder::new();
        let used = d.feed(b"{}\n{\"x\":1}\n").unwrap();
        assert_eq!(used, 3);
        assert_eq!(d.feed(b"more").unwrap(), 0);
        assert_eq!(d.line(), Some(&b"{}"[..]));
    }

    #[test]
    fn overlong_line_resets() {
        let mut d = LineDecoder::new();
        let junk = [b'a'; MAX_LINE_LEN + 1];
        assert_eq!(d.feed(&junk), Err(NotecardError::LineTooLong));
        assert_eq!(d.pending(), 0);
        d.feed(b"{}\n").unwrap();
        assert_eq!(d.line(), Some(&b"{}"[..]));
    }

    #[test]
    fn encode_appends_terminator() {
        let line = encode_line(&serde_json::json!({"req": "card.location"})).unwrap();
        assert_eq!(line, b"{\"req\":\"card.location\"}\n");
    }
}
