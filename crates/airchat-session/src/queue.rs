//! FIFO hand-off between the consumer and the workers.
//!
//! Both queues are unbounded multi-producer channels. Each holds both ends so
//! a push can never fail while the queue is alive.

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender};

use crate::event::InboundEvent;

/// Encoded frames waiting for the transmit worker.
#[derive(Clone)]
pub struct OutboundQueue {
    tx: Sender<Bytes>,
    rx: Receiver<Bytes>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Enqueue a frame. Never blocks.
    pub fn push(&self, frame: Bytes) {
        // Cannot fail: `self.rx` keeps the channel connected.
        let _ = self.tx.send(frame);
    }

    /// Dequeue without blocking.
    pub fn try_pop(&self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }

    /// Receiving end for a worker that blocks on new frames.
    pub fn receiver(&self) -> &Receiver<Bytes> {
        &self.rx
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Events waiting for the consumer.
#[derive(Clone)]
pub struct InboundQueue {
    tx: Sender<InboundEvent>,
    rx: Receiver<InboundEvent>,
}

impl InboundQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Enqueue an event. Never blocks.
    pub fn push(&self, event: InboundEvent) {
        let _ = self.tx.send(event);
    }

    /// Take everything queued so far, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<InboundEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}
