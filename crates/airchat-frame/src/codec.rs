use bytes::{BufMut, Bytes, BytesMut};

use crate::channel::Channel;
use crate::error::{FrameError, Result};

/// End-of-frame marker. Never valid inside a body.
pub const SENTINEL: u8 = 0xFF;

/// Longest frame the board will buffer, sentinel included.
pub const MAX_FRAME_LEN: usize = 256;

/// Config frame tag (host to board).
pub const TAG_CONFIG: u8 = 1;
/// Chat frame tag (both directions).
pub const TAG_CHAT: u8 = 2;
/// Reset notice tag. The board sends `[3, 0xFF]` on every power-up.
pub const TAG_RESET: u8 = 3;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 16;
pub const MAX_MESSAGE_LEN: usize = 192;

/// Config nonce bounds. The board uses the nonce as its collision-avoidance
/// backoff, so it is drawn fresh for every configuration.
pub const NONCE_MIN: u8 = 10;
pub const NONCE_MAX: u8 = 50;

/// A decoded chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: String,
    /// Message text with trailing whitespace removed.
    pub text: String,
}

/// Why a chat frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFault {
    /// The frame ended before the username length byte.
    #[error("chat frame has no username length")]
    MissingLength,

    /// The username length points past the end of the frame.
    #[error("username length {declared} exceeds remaining {available} bytes")]
    UsernameOverrun { declared: usize, available: usize },

    /// Username or text contains bytes outside 7-bit ASCII.
    #[error("chat frame is not ASCII text")]
    NotAscii,
}

/// Classification of one raw inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A chat message from the remote peer.
    Chat(ChatMessage),
    /// The board restarted and forgot its configuration. `tag` is the
    /// leading byte that triggered this, or `None` for an empty read.
    Reset { tag: Option<u8> },
    /// A chat frame whose contents could not be interpreted.
    Malformed(DecodeFault),
}

/// Encode a chat frame.
///
/// Wire format:
/// ```text
/// ┌─────────┬──────────┬──────────────┬──────────────┬──────────┐
/// │ Tag (1) │ ULen (1) │ Username     │ Message      │ Sentinel │
/// │ 0x02    │ 3..=16   │ (ULen bytes) │ (1..=192 B)  │ 0xFF     │
/// └─────────┴──────────┴──────────────┴──────────────┴──────────┘
/// ```
pub fn encode_chat(username: &str, text: &str) -> Result<Bytes> {
    validate_username(username)?;

    if text.is_empty() {
        return Err(FrameError::InvalidMessage("message must not be empty"));
    }
    if !text.is_ascii() {
        return Err(FrameError::InvalidMessage("message must be 7-bit ASCII"));
    }
    if text.len() > MAX_MESSAGE_LEN {
        return Err(FrameError::InvalidMessage(
            "message must be at most 192 characters",
        ));
    }

    let mut dst = BytesMut::with_capacity(3 + username.len() + text.len());
    dst.put_u8(TAG_CHAT);
    dst.put_u8(username.len() as u8);
    dst.put_slice(username.as_bytes());
    dst.put_slice(text.as_bytes());
    dst.put_u8(SENTINEL);
    Ok(dst.freeze())
}

/// Encode a config frame: `[0x01][channel][nonce][0xFF]`.
pub fn encode_config(channel: u8, nonce: u8) -> Result<Bytes> {
    let channel = Channel::new(channel)?;
    if !(NONCE_MIN..=NONCE_MAX).contains(&nonce) {
        return Err(FrameError::InvalidNonce(nonce));
    }

    Ok(Bytes::copy_from_slice(&[
        TAG_CONFIG,
        channel.index(),
        nonce,
        SENTINEL,
    ]))
}

/// Check a username against the session rules: 3-16 printable ASCII bytes.
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.len();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(FrameError::InvalidUsername(
            "username must be 3-16 characters",
        ));
    }
    if !username.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return Err(FrameError::InvalidUsername(
            "username must be printable ASCII",
        ));
    }
    Ok(())
}

/// Classify one raw frame as read off the link.
///
/// The trailing sentinel is optional: a read cut short at the length limit
/// carries none.
pub fn decode_inbound(raw: &[u8]) -> Inbound {
    let Some((&tag, rest)) = raw.split_first() else {
        return Inbound::Reset { tag: None };
    };
    if tag != TAG_CHAT {
        return Inbound::Reset { tag: Some(tag) };
    }

    let body = rest.strip_suffix(&[SENTINEL]).unwrap_or(rest);
    let Some((&declared, payload)) = body.split_first() else {
        return Inbound::Malformed(DecodeFault::MissingLength);
    };

    let declared = declared as usize;
    if declared > payload.len() {
        return Inbound::Malformed(DecodeFault::UsernameOverrun {
            declared,
            available: payload.len(),
        });
    }

    let (username, text) = payload.split_at(declared);
    match (ascii(username), ascii(text)) {
        (Some(username), Some(text)) => Inbound::Chat(ChatMessage {
            username: username.to_string(),
            text: text.trim_end().to_string(),
        }),
        _ => Inbound::Malformed(DecodeFault::NotAscii),
    }
}

fn ascii(bytes: &[u8]) -> Option<&str> {
    if bytes.is_ascii() {
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}
