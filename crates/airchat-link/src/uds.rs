use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::traits::Link;

/// Unix socket stand-in for the radio board.
///
/// `cancel_pending` shuts the socket down in both directions, which wakes a
/// blocked reader with EOF.
impl Link for UnixStream {
    fn try_clone(&self) -> Result<Self> {
        Ok(UnixStream::try_clone(self)?)
    }

    fn cancel_pending(&self) -> Result<()> {
        match self.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Already torn down by the other side.
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn describe(&self) -> String {
        "unix:loopback".to_string()
    }
}

/// Create a connected pair of loopback links.
///
/// The first end is handed to the session; the second plays the radio board.
/// Both ends get `read_timeout` so neither side can hang a test forever.
pub fn loopback_pair(read_timeout: Option<Duration>) -> Result<(UnixStream, UnixStream)> {
    let (local, remote) = UnixStream::pair()?;
    local.set_read_timeout(read_timeout)?;
    remote.set_read_timeout(read_timeout)?;
    debug!(?read_timeout, "created loopback link pair");
    Ok((local, remote))
}
