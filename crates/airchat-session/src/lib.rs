//! Session layer for the air-chat radio link.
//!
//! [`ChatLink`] is the consumer-facing handle. It owns a transmit worker
//! that drains the outbound frame queue one frame per pacing interval, and a
//! receive worker that splits the inbound byte stream on the sentinel and
//! publishes [`InboundEvent`]s. Username and channel live in a shared
//! [`SessionState`] that a remote reset can clear.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod queue;
pub mod receive;
pub mod shutdown;
pub mod state;
pub mod transmit;

pub use chat::ChatLink;
pub use config::{EngineConfig, DEFAULT_PACING_INTERVAL, DEFAULT_POLL_INTERVAL};
pub use error::{Result, SessionError};
pub use event::{InboundEvent, Origin, Severity};
pub use queue::{InboundQueue, OutboundQueue};
pub use receive::{ReceiveEngine, ReceiveWorker, RESET_NOTICE};
pub use shutdown::ShutdownSignal;
pub use state::{SessionState, Settings};
pub use transmit::{TransmitEngine, TransmitWorker};
