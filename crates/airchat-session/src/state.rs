use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use airchat_frame::Channel;

/// Snapshot of the local session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Set by a local configure, cleared by a remote reset.
    pub username: Option<String>,
    pub channel: Channel,
}

/// Shared, lock-protected session fields.
///
/// Written by the consumer (configure) and by the receive worker (reset),
/// read by the transmit side when building frames.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Settings>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both fields. The caller has already validated them.
    pub fn configure(&self, username: String, channel: Channel) {
        let mut settings = self.lock();
        settings.username = Some(username);
        settings.channel = channel;
    }

    /// Forget the username after a remote reset. Returns the old value.
    pub fn clear_username(&self) -> Option<String> {
        self.lock().username.take()
    }

    pub fn username(&self) -> Option<String> {
        self.lock().username.clone()
    }

    pub fn channel(&self) -> Channel {
        self.lock().channel
    }

    pub fn is_configured(&self) -> bool {
        self.lock().username.is_some()
    }

    pub fn snapshot(&self) -> Settings {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
