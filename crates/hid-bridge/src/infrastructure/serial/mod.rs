//! Serial port adapter: opens the device link and exposes it as a
//! [`ByteSource`] for the session driver.
//!
//! The port is opened 8N1 with no flow control and a short read timeout.  DTR
//! and RTS are deasserted because many USB-serial boards wire them to the
//! microcontroller's reset and boot pins; leaving them asserted can hold the
//! device in reset.  After a short settle delay both buffers are cleared so the
//! session starts on fresh data rather than boot noise.

use std::io::{self, Read};
use std::time::Duration;

use serialport::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, SerialPortType,
    StopBits,
};
use thiserror::Error;
use tracing::debug;

use crate::application::session::{ByteSource, SourceError};

/// Errors while opening the serial link.  Both are fatal at startup.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to configure serial port {port}: {source}")]
    Configure {
        port: String,
        #[source]
        source: serialport::Error,
    },
}

/// Parameters for [`open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    /// Pause between opening and clearing the buffers.
    pub settle_delay: Duration,
}

/// An open serial link to the device.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for SerialConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialConnection")
            .field("port", &self.port.name())
            .finish()
    }
}

/// Opens and prepares the serial port.
///
/// Blocks for `settings.settle_delay`.
///
/// # Errors
///
/// Returns [`SerialError::Open`] if the port cannot be opened and
/// [`SerialError::Configure`] if the control lines or buffers cannot be set.
pub fn open(settings: &SerialSettings) -> Result<SerialConnection, SerialError> {
    let mut port = serialport::new(&settings.port, settings.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(settings.read_timeout)
        .open()
        .map_err(|source| SerialError::Open {
            port: settings.port.clone(),
            source,
        })?;

    let configure = |source| SerialError::Configure {
        port: settings.port.clone(),
        source,
    };
    port.write_data_terminal_ready(false).map_err(configure)?;
    port.write_request_to_send(false).map_err(configure)?;

    std::thread::sleep(settings.settle_delay);
    port.clear(ClearBuffer::All).map_err(configure)?;

    debug!(port = %settings.port, baud = settings.baud_rate, "serial port ready");
    Ok(SerialConnection { port })
}

/// Lists serial ports visible to the OS, one description per port.
///
/// Enumeration failures yield an empty list; this is only used for diagnostics.
pub fn list_port_names() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.iter().map(describe_port).collect(),
        Err(e) => {
            debug!("port enumeration failed: {e}");
            Vec::new()
        }
    }
}

fn describe_port(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("USB serial");
            format!(
                "{} ({product}, {:04x}:{:04x})",
                info.port_name, usb.vid, usb.pid
            )
        }
        _ => info.port_name.clone(),
    }
}

impl ByteSource for SerialConnection {
    fn bytes_available(&mut self) -> Result<usize, SourceError> {
        let waiting = self
            .port
            .bytes_to_read()
            .map_err(|e| SourceError::Port(e.to_string()))?;
        Ok(waiting as usize)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        read_result(self.port.read(buf))
    }
}

/// A read timeout just means nothing arrived in time.
fn read_result(result: io::Result<usize>) -> Result<usize, SourceError> {
    match result {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
        Err(e) => Err(SourceError::Io(e)),
    }
}
