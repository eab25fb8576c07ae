//! Text chat over a 1200 baud half-duplex serial radio link.
//!
//! airchat talks to a small radio board over a UART. Frames are terminated by
//! a `0xFF` sentinel; outbound transmissions are paced so the half-duplex
//! radio is never asked to send while it is still busy.
//!
//! # Crate Structure
//!
//! - [`link`] — Serial port and loopback byte transports
//! - [`frame`] — Sentinel-delimited frame codec and channel catalog
//! - [`session`] — Transmit/receive workers and the [`session::ChatLink`] handle
//!   (behind the `session` feature)

/// Re-export link types.
pub mod link {
    pub use airchat_link::*;
}

/// Re-export frame types.
pub mod frame {
    pub use airchat_frame::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use airchat_session::*;
}
