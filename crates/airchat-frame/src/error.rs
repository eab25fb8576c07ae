/// Errors that can occur during frame encoding or link I/O.
///
/// Malformed inbound data is not an error: see [`crate::Inbound`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Username is not 3-16 bytes of printable ASCII.
    #[error("invalid username: {0}")]
    InvalidUsername(&'static str),

    /// Message text is empty, longer than 192 bytes, or not 7-bit ASCII.
    #[error("invalid message: {0}")]
    InvalidMessage(&'static str),

    /// Channel index outside the 16-entry talkgroup catalog.
    #[error("invalid channel {0} (expected 0-15)")]
    InvalidChannel(u8),

    /// Config nonce outside the range the board accepts.
    #[error("invalid nonce {0} (expected 10-50)")]
    InvalidNonce(u8),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link reached end-of-stream.
    #[error("link closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
