use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::traits::Link;

/// Baud rate of the radio board's UART.
pub const DEFAULT_BAUD_RATE: u32 = 1200;

/// Default read timeout. Bounds how long the receive worker stays parked
/// before it re-checks the shutdown flag.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Connection parameters for the serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Port identifier, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Line speed. The board only speaks 1200.
    pub baud_rate: u32,
    /// Read timeout applied to the port.
    pub read_timeout: Duration,
}

impl LinkConfig {
    /// Config for `port` at the board's default line settings.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// An open serial connection to the radio board (8N1, no flow control).
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open the port named in `config`.
    ///
    /// Anything already buffered in either direction is discarded so the
    /// receive loop starts on a frame boundary.
    pub fn open(config: &LinkConfig) -> Result<Self> {
        debug!(
            port = %config.port,
            baud = config.baud_rate,
            "opening serial link"
        );

        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| LinkError::Unavailable {
                port: config.port.clone(),
                source,
            })?;

        port.clear(ClearBuffer::All)?;

        info!(port = %config.port, baud = config.baud_rate, "serial link connected");

        Ok(Self {
            port,
            name: config.port.clone(),
        })
    }

    /// Port identifier this link was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl Link for SerialLink {
    fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            port: self.port.try_clone()?,
            name: self.name.clone(),
        })
    }

    fn cancel_pending(&self) -> Result<()> {
        // Readers wake on their own timeout; dropping the buffers keeps a
        // half-written frame from reaching the board after we stop.
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("serial:{}", self.name)
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink").field("port", &self.name).finish()
    }
}

/// One entry of [`available_ports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub kind: &'static str,
    pub product: Option<String>,
}

/// List serial ports visible to this host.
pub fn available_ports() -> Result<Vec<PortSummary>> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|info| {
            let (kind, product) = match info.port_type {
                SerialPortType::UsbPort(usb) => ("usb", usb.product),
                SerialPortType::PciPort => ("pci", None),
                SerialPortType::BluetoothPort => ("bluetooth", None),
                SerialPortType::Unknown => ("unknown", None),
            };
            PortSummary {
                name: info.port_name,
                kind,
                product,
            }
        })
        .collect())
}
