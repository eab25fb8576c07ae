use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Process-wide stop flag shared by the workers.
///
/// Set once. Besides the flag, triggering disconnects a wake-up channel so a
/// worker parked in [`ShutdownSignal::wait_timeout`] or in a `select!` on
/// [`ShutdownSignal::waker`] returns immediately.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

struct Inner {
    flag: AtomicBool,
    wake_tx: Mutex<Option<Sender<()>>>,
    wake_rx: Receiver<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                wake_tx: Mutex::new(Some(tx)),
                wake_rx: rx,
            }),
        }
    }

    /// Set the flag and wake every waiter. Returns false if it was already set.
    pub fn trigger(&self) -> bool {
        if self.inner.flag.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.inner
            .wake_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// Sleep for `timeout` unless shutdown is triggered first.
    ///
    /// Returns true if shutdown was triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.inner.wake_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => self.is_triggered(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    /// Channel that becomes ready (disconnected) once shutdown is triggered.
    pub fn waker(&self) -> &Receiver<()> {
        &self.inner.wake_rx
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
