//! Transport abstraction — the byte channel to the Notecard.
//!
//! Concrete implementations:
//! - UART serial ([`UartTransport`](crate::adapters::uart_transport::UartTransport))
//! - [`NullTransport`] for host simulation (Notecard absent)
//!
//! The [`NotecardClient`](super::client::NotecardClient) is generic over
//! `Transport`, so moving the Notecard to I²C requires zero changes to
//! the request/response logic.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Blocks for at most the transport's receive timeout.
    /// Returns 0 if nothing arrived before the timeout.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Drop any stale received bytes before a new request goes out.
    fn clear_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A null transport that discards all writes and never answers.
/// Every round trip over it ends in a response timeout.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
