//! Sentinel-terminated message framing for the air-chat radio protocol.
//!
//! Every frame on the wire is:
//! - A 1-byte type tag (config = 1, chat = 2, reset = 3)
//! - A type-specific body of 7-bit ASCII and small integers
//! - The sentinel byte `0xFF`, which can never appear in a body
//!
//! Frames are at most 256 bytes. Decoding never fails: anything that does not
//! parse is classified so the receive loop can report it and keep going.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::{Channel, Modulation, CHANNEL_COUNT};
pub use codec::{
    decode_inbound, encode_chat, encode_config, validate_username, ChatMessage, DecodeFault,
    Inbound, MAX_FRAME_LEN, MAX_MESSAGE_LEN, MAX_USERNAME_LEN, MIN_USERNAME_LEN, NONCE_MAX,
    NONCE_MIN, SENTINEL, TAG_CHAT, TAG_CONFIG, TAG_RESET,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// Lowercase hex rendering of a frame for debug logs.
pub fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
