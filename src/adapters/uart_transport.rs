//! UART transport to the Notecard.
//!
//! Raw ESP-IDF UART driver calls on target.  Reads block up to the
//! configured receive timeout and return 0 bytes when it expires.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::drivers::hw_init::HwInitError;
#[cfg(target_os = "espidf")]
use crate::notecard::transport::Transport;

/// Error returned by the raw UART calls (ESP-IDF return code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartError(pub i32);

/// The Notecard serial link.
pub struct UartTransport {
    port: i32,
    rx_timeout_ms: u32,
}

impl UartTransport {
    /// Install the UART driver on the Notecard pins.
    #[cfg(target_os = "espidf")]
    pub fn new(rx_timeout_ms: u32) -> Result<Self, HwInitError> {
        use crate::pins;

        let port = pins::NOTECARD_UART_NUM;
        let cfg = uart_config_t {
            baud_rate: pins::NOTECARD_UART_BAUD as _,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };

        // SAFETY: Called once from main() before the event loop; the port
        // is owned exclusively by this transport afterwards.
        unsafe {
            let ret = uart_driver_install(
                port as _,
                pins::NOTECARD_UART_RX_BUF,
                0,
                0,
                core::ptr::null_mut(),
                0,
            );
            if ret != ESP_OK as i32 {
                return Err(HwInitError::UartInitFailed(ret));
            }
            let ret = uart_param_config(port as _, &cfg);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::UartInitFailed(ret));
            }
            let ret = uart_set_pin(
                port as _,
                pins::NOTECARD_UART_TX_GPIO,
                pins::NOTECARD_UART_RX_GPIO,
                -1,
                -1,
            );
            if ret != ESP_OK as i32 {
                return Err(HwInitError::UartInitFailed(ret));
            }
        }

        info!(
            "Notecard UART{} ready ({} baud, TX={}, RX={})",
            port,
            pins::NOTECARD_UART_BAUD,
            pins::NOTECARD_UART_TX_GPIO,
            pins::NOTECARD_UART_RX_GPIO
        );
        Ok(Self {
            port,
            rx_timeout_ms,
        })
    }

    /// Host builds have no UART; use `NullTransport` instead.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(_rx_timeout_ms: u32) -> Result<Self, HwInitError> {
        Err(HwInitError::UartInitFailed(-1))
    }

    pub fn rx_timeout_ms(&self) -> u32 {
        self.rx_timeout_ms
    }

    #[cfg(target_os = "espidf")]
    fn timeout_ticks(&self) -> TickType_t {
        (u64::from(self.rx_timeout_ms) * u64::from(configTICK_RATE_HZ) / 1000) as TickType_t
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UartTransport {
    type Error = UartError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        // SAFETY: buf is valid for buf.len() bytes for the duration of the call.
        let n = unsafe {
            uart_read_bytes(
                self.port as _,
                buf.as_mut_ptr().cast(),
                buf.len() as _,
                self.timeout_ticks(),
            )
        };
        if n < 0 {
            return Err(UartError(n));
        }
        Ok(n as usize)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        // SAFETY: data is valid for data.len() bytes; the driver copies it.
        let n = unsafe { uart_write_bytes(self.port as _, data.as_ptr().cast(), data.len()) };
        if n < 0 {
            return Err(UartError(n));
        }
        Ok(n as usize)
    }

    fn flush(&mut self) -> Result<(), UartError> {
        // SAFETY: port was installed in new().
        let ret = unsafe { uart_wait_tx_done(self.port as _, self.timeout_ticks()) };
        if ret != ESP_OK as i32 {
            return Err(UartError(ret));
        }
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), UartError> {
        // SAFETY: port was installed in new().
        let ret = unsafe { uart_flush_input(self.port as _) };
        if ret != ESP_OK as i32 {
            return Err(UartError(ret));
        }
        Ok(())
    }
}
