use std::thread::{self, JoinHandle};

use airchat_frame::{FrameReader, FrameWriter};
use airchat_link::{Link, LinkConfig, SerialLink};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SessionError};
use crate::event::InboundEvent;
use crate::queue::{InboundQueue, OutboundQueue};
use crate::receive::{ReceiveEngine, ReceiveWorker};
use crate::shutdown::ShutdownSignal;
use crate::state::{SessionState, Settings};
use crate::transmit::{TransmitEngine, TransmitWorker};

type Worker = (&'static str, JoinHandle<Result<()>>);

/// A running chat session over one link.
///
/// Owns the transmit and receive workers. The consumer calls
/// [`configure`](Self::configure) and [`send_chat`](Self::send_chat) and
/// drains [`poll_inbound_events`](Self::poll_inbound_events) on its own
/// schedule. Dropping the session shuts it down.
pub struct ChatLink<L: Link> {
    link: L,
    session: SessionState,
    transmit: TransmitEngine,
    outbound: OutboundQueue,
    inbound: InboundQueue,
    shutdown: ShutdownSignal,
    workers: Vec<Worker>,
}

impl ChatLink<SerialLink> {
    /// Open the serial port and start the workers.
    ///
    /// Fails with `LinkError::Unavailable` if the port cannot be opened.
    pub fn open(link_config: &LinkConfig, config: EngineConfig) -> Result<Self> {
        let link = SerialLink::open(link_config)?;
        Self::start(link, config)
    }
}

impl<L: Link> ChatLink<L> {
    /// Start both workers over an already-open link.
    pub fn start(link: L, config: EngineConfig) -> Result<Self> {
        let session = SessionState::new();
        let outbound = OutboundQueue::new();
        let inbound = InboundQueue::new();
        let shutdown = ShutdownSignal::new();

        let reader = FrameReader::new(link.try_clone()?);
        let writer = FrameWriter::new(link.try_clone()?);

        let mut chat = Self {
            transmit: TransmitEngine::new(session.clone(), outbound.clone(), inbound.clone()),
            link,
            session: session.clone(),
            outbound: outbound.clone(),
            inbound: inbound.clone(),
            shutdown: shutdown.clone(),
            workers: Vec::with_capacity(2),
        };

        let receive = ReceiveWorker::new(
            reader,
            ReceiveEngine::new(session, inbound.clone()),
            inbound.clone(),
            shutdown.clone(),
            config.read_limit,
        );
        // On error `chat` is dropped, which stops any worker already running.
        chat.spawn("receive", "airchat-rx", move || receive.run())?;

        let transmit = TransmitWorker::new(
            writer,
            outbound,
            inbound,
            shutdown,
            config.pacing_interval,
        );
        chat.spawn("transmit", "airchat-tx", move || transmit.run())?;

        info!(link = %chat.link.describe(), "chat link started");
        Ok(chat)
    }

    fn spawn<F>(&mut self, name: &'static str, thread_name: &str, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(body)
            .map_err(|source| SessionError::Spawn { name, source })?;
        self.workers.push((name, handle));
        Ok(())
    }

    /// Set username and channel and queue the config frame.
    pub fn configure(&self, username: &str, channel: u8) -> Result<()> {
        self.ensure_running()?;
        self.transmit.submit_config(username, channel).map(|_| ())
    }

    /// Queue a chat message under the configured username.
    pub fn send_chat(&self, text: &str) -> Result<()> {
        self.ensure_running()?;
        self.transmit.submit_chat(text)
    }

    /// Everything published since the last poll, oldest first. Never blocks.
    pub fn poll_inbound_events(&self) -> Vec<InboundEvent> {
        self.inbound.drain()
    }

    /// Current username and channel.
    pub fn settings(&self) -> Settings {
        self.session.snapshot()
    }

    /// Frames queued but not yet written to the link.
    pub fn pending_outbound(&self) -> usize {
        self.outbound.len()
    }

    /// False once shutdown has started or either worker has exited.
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_triggered()
            && !self.workers.is_empty()
            && self.workers.iter().all(|(_, handle)| !handle.is_finished())
    }

    /// Stop both workers and wait for them. Safe to call more than once.
    ///
    /// Returns the first error a worker exited with, if any.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.workers.is_empty() {
            self.shutdown.trigger();
            return Ok(());
        }

        self.shutdown.trigger();
        if let Err(err) = self.link.cancel_pending() {
            warn!(error = %err, "failed to cancel pending link operations");
        }

        let mut first_err = None;
        for (name, handle) in self.workers.drain(..) {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(worker = name, error = %err, "worker exited with error");
                    first_err.get_or_insert(err);
                }
                Err(_) => {
                    first_err.get_or_insert(SessionError::WorkerPanicked(name));
                }
            }
        }

        info!(unsent = self.outbound.len(), "chat link shut down");
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.shutdown.is_triggered() {
            return Err(SessionError::ShutDown);
        }
        Ok(())
    }
}

impl<L: Link> Drop for ChatLink<L> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::time::{Duration, Instant};

    use airchat_frame::{encode_chat, FrameReader};
    use airchat_link::loopback_pair;

    use super::*;
    use crate::event::{Origin, Severity};
    use crate::receive::RESET_NOTICE;

    fn start(pacing: Duration) -> (ChatLink<UnixStream>, UnixStream) {
        let (local, remote) = loopback_pair(Some(Duration::from_millis(50))).unwrap();
        remote
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let config = EngineConfig {
            pacing_interval: pacing,
            ..EngineConfig::default()
        };
        (ChatLink::start(local, config).unwrap(), remote)
    }

    fn poll_until<F>(chat: &ChatLink<UnixStream>, mut done: F) -> Vec<InboundEvent>
    where
        F: FnMut(&[InboundEvent]) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(chat.poll_inbound_events());
            if done(&events) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        events
    }

    #[test]
    fn configure_and_chat_reach_the_board_paced() {
        let pacing = Duration::from_millis(60);
        let (mut chat, remote) = start(pacing);
        let mut board = FrameReader::new(remote);

        chat.configure("alice", 2).unwrap();
        chat.send_chat("hello").unwrap();

        let config = board.read_until_sentinel(256).unwrap();
        let first_at = Instant::now();
        assert_eq!(config.len(), 4);
        assert_eq!(&config[..2], &[1, 2]);
        assert!((10..=50).contains(&config[2]));

        let message = board.read_until_sentinel(256).unwrap();
        assert!(first_at.elapsed() >= pacing / 2);
        assert_eq!(message, encode_chat("alice", "hello").unwrap());

        let events = chat.poll_inbound_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity(), Some(Severity::Info));
        assert_eq!(events[1], InboundEvent::local("alice", "hello"));

        chat.shutdown().unwrap();
    }

    #[test]
    fn board_messages_and_resets_reach_the_consumer() {
        let (mut chat, mut remote) = start(Duration::from_millis(10));
        chat.configure("alice", 0).unwrap();

        remote.write_all(&encode_chat("bob", "hey").unwrap()).unwrap();
        remote.write_all(&[3, 0xFF]).unwrap();

        let events = poll_until(&chat, |events| {
            events
                .iter()
                .any(|event| event.severity() == Some(Severity::Warning))
        });

        assert!(events.contains(&InboundEvent::UserMessage {
            username: "bob".to_string(),
            text: "hey".to_string(),
            origin: Origin::Peer,
        }));
        assert_eq!(events.last(), Some(&InboundEvent::warning(RESET_NOTICE)));
        assert_eq!(chat.settings().username, None);

        assert!(matches!(
            chat.send_chat("anyone?"),
            Err(SessionError::NotConfigured)
        ));

        chat.shutdown().unwrap();
    }

    #[test]
    fn send_before_configure_leaves_outbound_empty() {
        let (mut chat, _remote) = start(Duration::from_millis(10));

        assert!(matches!(
            chat.send_chat("hi"),
            Err(SessionError::NotConfigured)
        ));
        assert_eq!(chat.pending_outbound(), 0);

        let events = chat.poll_inbound_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity(), Some(Severity::Error));

        chat.shutdown().unwrap();
    }

    #[test]
    fn shutdown_is_idempotent_and_blocks_further_sends() {
        let (mut chat, _remote) = start(Duration::from_secs(3));
        assert!(chat.is_running());

        chat.configure("alice", 1).unwrap();
        chat.send_chat("queued behind pacing").unwrap();

        let start = Instant::now();
        chat.shutdown().unwrap();
        chat.shutdown().unwrap();
        assert!(start.elapsed() < Duration::from_secs(3));

        assert!(!chat.is_running());
        assert!(matches!(chat.send_chat("late"), Err(SessionError::ShutDown)));
        assert!(matches!(
            chat.configure("alice", 1),
            Err(SessionError::ShutDown)
        ));
    }

    #[test]
    fn remote_hangup_is_reported() {
        let (mut chat, remote) = start(Duration::from_millis(10));
        drop(remote);

        let events = poll_until(&chat, |events| !events.is_empty());
        assert_eq!(events, vec![InboundEvent::error("link closed")]);

        assert!(chat.shutdown().is_err());
    }

    #[test]
    fn open_missing_port_is_fatal() {
        let config = LinkConfig::new("/dev/airchat-missing-port");
        let err = ChatLink::open(&config, EngineConfig::default()).err().unwrap();
        assert!(matches!(
            err,
            SessionError::Link(airchat_link::LinkError::Unavailable { .. })
        ));
    }
}
