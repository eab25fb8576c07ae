use serde::Serialize;

/// Who produced a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Received from the remote peer.
    Peer,
    /// Local echo of a message we sent.
    Local,
}

/// How a system message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One item delivered to the consumer through the inbound queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    UserMessage {
        username: String,
        text: String,
        origin: Origin,
    },
    SystemMessage {
        severity: Severity,
        text: String,
    },
}

impl InboundEvent {
    pub fn peer(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self::UserMessage {
            username: username.into(),
            text: text.into(),
            origin: Origin::Peer,
        }
    }

    pub fn local(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self::UserMessage {
            username: username.into(),
            text: text.into(),
            origin: Origin::Local,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::system(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::system(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::system(Severity::Error, text)
    }

    pub fn system(severity: Severity, text: impl Into<String>) -> Self {
        Self::SystemMessage {
            severity,
            text: text.into(),
        }
    }

    /// Severity of a system message; `None` for user messages.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            InboundEvent::SystemMessage { severity, .. } => Some(*severity),
            InboundEvent::UserMessage { .. } => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            InboundEvent::UserMessage { text, .. } | InboundEvent::SystemMessage { text, .. } => {
                text
            }
        }
    }
}
