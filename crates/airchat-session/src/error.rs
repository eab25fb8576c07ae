use airchat_frame::FrameError;
use airchat_link::LinkError;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Link-level error (opening or cancelling the port).
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// Frame-level error: local validation or link I/O.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A chat message was submitted before a username was configured.
    #[error("session not configured: set a username and channel first")]
    NotConfigured,

    /// The session has been shut down.
    #[error("session is shut down")]
    ShutDown,

    /// A worker thread could not be started.
    #[error("failed to spawn {name} worker: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    /// A worker thread panicked.
    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),
}

impl SessionError {
    /// True for errors raised by local input checks, before anything is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SessionError::NotConfigured
                | SessionError::Frame(
                    FrameError::InvalidUsername(_)
                        | FrameError::InvalidMessage(_)
                        | FrameError::InvalidChannel(_)
                        | FrameError::InvalidNonce(_)
                )
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
