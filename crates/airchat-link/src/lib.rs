//! Byte transport for the air-chat radio link.
//!
//! The radio board is attached over a slow (1200 baud) half-duplex UART. This
//! crate owns opening that port and handing out one handle per worker:
//! - [`SerialLink`] for the real device
//! - `UnixStream` (Unix only) as a loopback link for tests and simulators
//!
//! This is the lowest layer of airchat. Framing lives in `airchat-frame`.

pub mod error;
pub mod serial;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{LinkError, Result};
pub use serial::{available_ports, LinkConfig, PortSummary, SerialLink, DEFAULT_BAUD_RATE};
pub use traits::Link;

#[cfg(unix)]
pub use uds::loopback_pair;
