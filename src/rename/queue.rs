use std::mem;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// A rename that hit a locked source file and is waiting for the next retry sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRename {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Thread-safe FIFO of pending renames.
///
/// Watch handlers append while the retry sweep drains. `drain` swaps the whole
/// backlog out under the lock, so the sweep does its renames without holding it.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: Mutex<Vec<PendingRename>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingRename>> {
        // A panicking holder can't leave the Vec half-updated, so keep going with it.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn enqueue(&self, entry: PendingRename) {
        self.lock().push(entry);
    }

    /// Take everything currently queued, leaving the queue empty.
    pub fn drain(&self) -> Vec<PendingRename> {
        mem::take(&mut *self.lock())
    }

    /// Append a batch after whatever was enqueued since the last drain.
    pub fn requeue(&self, entries: Vec<PendingRename>) {
        if entries.is_empty() {
            return;
        }
        self.lock().extend(entries);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current backlog in queue order.
    pub fn snapshot(&self) -> Vec<PendingRename> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> PendingRename {
        PendingRename {
            source: PathBuf::from(format!("/shots/{}_old", name)),
            destination: PathBuf::from(format!("/shots/{}_new", name)),
        }
    }

    #[test]
    fn test_drain_takes_everything_in_order() {
        let queue = PendingQueue::new();
        queue.enqueue(entry("a"));
        queue.enqueue(entry("b"));
        queue.enqueue(entry("a"));

        let drained = queue.drain();
        assert_eq!(drained, vec![entry("a"), entry("b"), entry("a")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_requeue_lands_after_new_entries() {
        let queue = PendingQueue::new();
        queue.enqueue(entry("old"));
        let drained = queue.drain();

        queue.enqueue(entry("fresh"));
        queue.requeue(drained);

        assert_eq!(queue.snapshot(), vec![entry("fresh"), entry("old")]);
        assert_eq!(queue.len(), 2);
    }
}
