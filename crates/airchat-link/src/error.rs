/// Errors that can occur on the serial link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The port could not be opened. Fatal at startup.
    #[error("link unavailable: failed to open {port}: {source}")]
    Unavailable {
        port: String,
        source: serialport::Error,
    },

    /// The serial driver reported an error on an open port.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
