//! Blocking request/response client for the Notecard.
//!
//! One request goes out as a JSON line, then the client reads until one
//! response line comes back or the transport's receive timeout expires.
//! The client is not reentrant: it owns the transport and `&mut self`
//! serializes every call.  Nothing is retried here; retry policy belongs
//! to the acquisition state machine.

use log::{debug, warn};

use crate::app::ports::NotecardPort;
use crate::error::{NotecardError, Result};

use super::codec::{LineDecoder, encode_line};
use super::request::Request;
use super::response::Response;
use super::transport::Transport;

/// Read chunk size for a single transport read.
const READ_CHUNK: usize = 64;

/// Upper bound on empty-handed reads per response, so a chatty but broken
/// link cannot hold the loop forever.
const MAX_READS_PER_RESPONSE: usize = 64;

/// Notecard client over any byte [`Transport`].
pub struct NotecardClient<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    requests: u32,
    failures: u32,
}

impl<T: Transport> NotecardClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            requests: 0,
            failures: 0,
        }
    }

    /// Requests issued since boot.
    pub fn request_count(&self) -> u32 {
        self.requests
    }

    /// Requests that ended without a usable response.
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    /// Access the underlying transport (tests, diagnostics).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full round trip: encode, write, read one response line.
    pub fn transact(&mut self, request: &Request) -> Result<Response> {
        self.requests = self.requests.wrapping_add(1);
        let result = self.exchange(request);
        if result.is_err() {
            self.failures = self.failures.wrapping_add(1);
        }
        result
    }

    /// Round trip for a request whose only answer is success or `err`.
    pub fn command(&mut self, request: &Request) -> Result<()> {
        let rsp = self.transact(request)?;
        match rsp.error() {
            Some(err) => {
                debug!("notecard: {} err: {}", request.name(), err);
                Err(NotecardError::Rejected)
            }
            None => Ok(()),
        }
    }

    fn exchange(&mut self, request: &Request) -> Result<Response> {
        let line = encode_line(request)?;
        debug!("notecard >> {}", String::from_utf8_lossy(&line).trim_end());

        self.transport
            .clear_input()
            .map_err(|_| NotecardError::ReadFailed)?;
        self.write_all(&line)?;
        self.transport.flush().map_err(|_| NotecardError::WriteFailed)?;

        self.read_line()
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.transport.write(data) {
                Ok(0) | Err(_) => return Err(NotecardError::WriteFailed),
                Ok(n) => data = &data[n..],
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Response> {
        self.decoder.reset();
        let mut chunk = [0u8; READ_CHUNK];

        for _ in 0..MAX_READS_PER_RESPONSE {
            let n = self
                .transport
                .read(&mut chunk)
                .map_err(|_| NotecardError::ReadFailed)?;
            if n == 0 {
                return Err(NotecardError::ResponseTimeout);
            }

            // Only one request is ever outstanding; bytes after the
            // response line are stale and dropped.
            self.decoder.feed(&chunk[..n])?;
            if let Some(line) = self.decoder.line() {
                debug!("notecard << {}", String::from_utf8_lossy(line));
                let rsp = Response::parse(line);
                self.decoder.reset();
                return rsp;
            }
        }

        Err(NotecardError::ResponseTimeout)
    }
}

impl<T: Transport> NotecardPort for NotecardClient<T> {
    fn send(&mut self, request: &Request) -> bool {
        match self.command(request) {
            Ok(()) => true,
            Err(e) => {
                warn!("notecard: {} failed: {}", request.name(), e);
                false
            }
        }
    }

    fn request_and_response(&mut self, request: &Request) -> Option<Response> {
        match self.transact(request) {
            Ok(rsp) => {
                if let Some(err) = rsp.error() {
                    debug!("notecard: {} answered err: {}", request.name(), err);
                }
                Some(rsp)
            }
            Err(e) => {
                warn!("notecard: {} failed: {}", request.name(), e);
                None
            }
        }
    }
}
