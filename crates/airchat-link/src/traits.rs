use std::io::{Read, Write};

use crate::error::Result;

/// A connected byte link to the radio board.
///
/// The link is half-duplex on the air but full-duplex on the UART, so the
/// session runs exactly one reader and one writer over independent handles
/// obtained with [`Link::try_clone`]. Neither handle needs extra locking.
pub trait Link: Read + Write + Send + Sized + 'static {
    /// Open a second handle to the same underlying connection.
    fn try_clone(&self) -> Result<Self>;

    /// Unblock any reader or writer parked on this connection.
    ///
    /// Called once during shutdown, after the shutdown flag is set. Bytes still
    /// queued in either direction may be discarded.
    fn cancel_pending(&self) -> Result<()>;

    /// Human-readable name used in logs.
    fn describe(&self) -> String;
}
