//! Talkgroup channel catalog.
//!
//! The board exposes 16 fixed channels. The lower bank (0-7) runs 2-FSK and is
//! labelled `CH00`..`CH07`; the upper bank (8-15) runs OOK and is labelled
//! `CH10`..`CH17`.

use serde::Serialize;

use crate::error::{FrameError, Result};

/// Number of talkgroup channels.
pub const CHANNEL_COUNT: u8 = 16;

/// Channels per modulation bank.
const BANK_SIZE: u8 = 8;

/// Radio modulation used by a channel bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modulation {
    #[serde(rename = "2fsk")]
    TwoFsk,
    Ook,
}

impl Modulation {
    pub fn as_str(self) -> &'static str {
        match self {
            Modulation::TwoFsk => "2-FSK",
            Modulation::Ook => "OOK",
        }
    }
}

/// A validated channel index (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Channel(u8);

impl Channel {
    /// Validate a raw channel index.
    pub fn new(index: u8) -> Result<Self> {
        if index < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(FrameError::InvalidChannel(index))
        }
    }

    /// The whole catalog, in index order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..CHANNEL_COUNT).map(Channel)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Display label: bank digit then slot digit.
    pub fn label(self) -> String {
        format!("CH{}{}", self.0 / BANK_SIZE, self.0 % BANK_SIZE)
    }

    pub fn modulation(self) -> Modulation {
        if self.0 < BANK_SIZE {
            Modulation::TwoFsk
        } else {
            Modulation::Ook
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = FrameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
