//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements   | Connects to               |
//! |------------------|--------------|---------------------------|
//! | `log_sink`       | EventSink    | Serial log output         |
//! | `time`           | Clock        | ESP32 timer / FreeRTOS    |
//! | `uart_transport` | Transport    | Notecard over UART        |
//!
//! The Notecard port itself is implemented by
//! [`NotecardClient`](crate::notecard::NotecardClient) over any transport.

pub mod log_sink;
pub mod time;
pub mod uart_transport;
