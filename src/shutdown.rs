use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Mutex;
use std::time::Duration;

/// Create a linked trigger/token pair.
pub fn channel() -> (ShutdownHandle, ShutdownToken) {
    let (tx, rx) = bounded::<()>(0);
    (
        ShutdownHandle {
            tx: Mutex::new(Some(tx)),
        },
        ShutdownToken { rx },
    )
}

/// Requests shutdown. Closing the channel wakes every token clone at once.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: Mutex<Option<Sender<()>>>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        let mut tx = self.tx.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        tx.take();
    }
}

/// Observed by sweeps between steps and by the idle wait between retry sweeps.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    rx: Receiver<()>,
}

impl ShutdownToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for `timeout` unless shutdown is requested first. Returns `true` on shutdown.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }
}
