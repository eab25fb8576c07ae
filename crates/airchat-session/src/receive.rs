use std::io::Read;

use airchat_frame::{decode_inbound, hex, FrameError, FrameReader, Inbound};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::event::InboundEvent;
use crate::queue::InboundQueue;
use crate::shutdown::ShutdownSignal;
use crate::state::SessionState;

/// Text shown when the board asks to be configured again.
pub const RESET_NOTICE: &str = "Radio board reset - please reconfigure username and channel";

/// Classifies raw frames and publishes the result.
///
/// Every frame is handled on its own; nothing carries over between frames.
#[derive(Clone)]
pub struct ReceiveEngine {
    session: SessionState,
    inbound: InboundQueue,
}

impl ReceiveEngine {
    pub fn new(session: SessionState, inbound: InboundQueue) -> Self {
        Self { session, inbound }
    }

    /// Decode one frame and publish the matching event.
    pub fn handle_frame(&self, raw: &[u8]) {
        match decode_inbound(raw) {
            Inbound::Chat(message) => {
                debug!(username = %message.username, len = message.text.len(), "chat received");
                self.inbound
                    .push(InboundEvent::peer(message.username, message.text));
            }
            Inbound::Reset { tag } => {
                let previous = self.session.clear_username();
                warn!(?tag, ?previous, "remote reset, session username cleared");
                self.inbound.push(InboundEvent::warning(RESET_NOTICE));
            }
            Inbound::Malformed(fault) => {
                warn!(%fault, frame = %hex(raw), "undecodable chat frame");
                self.inbound.push(InboundEvent::error(format!(
                    "Message error, unable to decode RX: {fault}"
                )));
            }
        }
    }
}

/// Dedicated thread body that reads frames off the link.
pub struct ReceiveWorker<R> {
    reader: FrameReader<R>,
    engine: ReceiveEngine,
    inbound: InboundQueue,
    shutdown: ShutdownSignal,
    read_limit: usize,
}

impl<R: Read> ReceiveWorker<R> {
    pub fn new(
        reader: FrameReader<R>,
        engine: ReceiveEngine,
        inbound: InboundQueue,
        shutdown: ShutdownSignal,
        read_limit: usize,
    ) -> Self {
        Self {
            reader,
            engine,
            inbound,
            shutdown,
            read_limit,
        }
    }

    /// Loop until shutdown. Malformed data never ends the loop; only a dead
    /// link does.
    pub fn run(mut self) -> Result<()> {
        info!(read_limit = self.read_limit, "receive worker started");

        while !self.shutdown.is_triggered() {
            let raw = match self.reader.read_until_sentinel(self.read_limit) {
                Ok(raw) => raw,
                Err(_) if self.shutdown.is_triggered() => break,
                Err(err) => {
                    let reason = match &err {
                        FrameError::ConnectionClosed => "link closed".to_string(),
                        other => format!("link read failed: {other}"),
                    };
                    error!(error = %err, "receive worker stopping");
                    self.inbound.push(InboundEvent::error(reason));
                    return Err(err.into());
                }
            };
            if raw.is_empty() {
                continue;
            }

            debug!(len = raw.len(), frame = %hex(&raw), "uart rx");
            self.engine.handle_frame(&raw);
        }

        info!(buffered = self.reader.pending(), "receive worker stopped");
        Ok(())
    }
}
