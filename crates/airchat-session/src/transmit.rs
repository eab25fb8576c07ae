use std::io::Write;
use std::time::Duration;

use airchat_frame::{
    encode_chat, encode_config, hex, validate_username, Channel, FrameWriter, NONCE_MAX,
    NONCE_MIN,
};
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::error::{Result, SessionError};
use crate::event::InboundEvent;
use crate::queue::{InboundQueue, OutboundQueue};
use crate::shutdown::ShutdownSignal;
use crate::state::SessionState;

/// Consumer-facing half of the transmit path: validates, encodes and queues.
#[derive(Clone)]
pub struct TransmitEngine {
    session: SessionState,
    outbound: OutboundQueue,
    inbound: InboundQueue,
}

impl TransmitEngine {
    pub fn new(session: SessionState, outbound: OutboundQueue, inbound: InboundQueue) -> Self {
        Self {
            session,
            outbound,
            inbound,
        }
    }

    /// Queue a chat message and echo it to the consumer.
    ///
    /// Rejections are also published as error system messages.
    pub fn submit_chat(&self, text: &str) -> Result<()> {
        let Some(username) = self.session.username() else {
            warn!("chat rejected: no username configured");
            self.inbound.push(InboundEvent::error(
                "message not sent: set a valid username and channel first",
            ));
            return Err(SessionError::NotConfigured);
        };

        let frame = encode_chat(&username, text).map_err(|err| self.reject(err.into()))?;

        debug!(len = frame.len(), "chat frame queued");
        self.outbound.push(frame);
        self.inbound
            .push(InboundEvent::local(username, text.trim_end()));
        Ok(())
    }

    /// Apply new settings and queue the matching config frame.
    ///
    /// Returns the nonce that was sent. Nothing changes if validation fails.
    pub fn submit_config(&self, username: &str, channel: u8) -> Result<u8> {
        validate_username(username).map_err(|err| self.reject(err.into()))?;
        let channel = Channel::new(channel).map_err(|err| self.reject(err.into()))?;

        let nonce = rand::rng().random_range(NONCE_MIN..=NONCE_MAX);
        let frame = encode_config(channel.index(), nonce)?;

        self.session.configure(username.to_string(), channel);
        self.outbound.push(frame);
        self.inbound.push(InboundEvent::info(format!(
            "Configuration settings: username - {username} | channel - {}",
            channel.label()
        )));

        info!(
            username,
            channel = %channel,
            modulation = channel.modulation().as_str(),
            nonce,
            "session configured"
        );
        Ok(nonce)
    }

    fn reject(&self, err: SessionError) -> SessionError {
        warn!(error = %err, "submission rejected");
        self.inbound
            .push(InboundEvent::error(format!("not sent: {err}")));
        err
    }
}

/// Dedicated thread body that drains the outbound queue onto the link.
///
/// One frame per pacing interval. The queue is not drained on shutdown.
pub struct TransmitWorker<W> {
    writer: FrameWriter<W>,
    outbound: OutboundQueue,
    inbound: InboundQueue,
    shutdown: ShutdownSignal,
    pacing: Duration,
}

impl<W: Write> TransmitWorker<W> {
    pub fn new(
        writer: FrameWriter<W>,
        outbound: OutboundQueue,
        inbound: InboundQueue,
        shutdown: ShutdownSignal,
        pacing: Duration,
    ) -> Self {
        Self {
            writer,
            outbound,
            inbound,
            shutdown,
            pacing,
        }
    }

    pub fn run(mut self) -> Result<()> {
        info!(pacing_ms = self.pacing.as_millis() as u64, "transmit worker started");

        loop {
            let next = crossbeam_channel::select! {
                recv(self.outbound.receiver()) -> frame => frame.ok(),
                recv(self.shutdown.waker()) -> _ => None,
            };
            let Some(frame) = next else {
                break;
            };
            if self.shutdown.is_triggered() {
                break;
            }

            debug!(len = frame.len(), frame = %hex(&frame), "uart tx");
            if let Err(err) = self.writer.write_frame(&frame) {
                if self.shutdown.is_triggered() {
                    break;
                }
                error!(error = %err, "link write failed");
                self.inbound
                    .push(InboundEvent::error(format!("link write failed: {err}")));
                return Err(err.into());
            }

            if self.shutdown.wait_timeout(self.pacing) {
                break;
            }
        }

        info!(unsent = self.outbound.len(), "transmit worker stopped");
        Ok(())
    }
}
