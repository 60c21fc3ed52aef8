use crate::rename::{FileMover, RenameExecutor, RenameOutcome};
use crate::shutdown::ShutdownToken;
use tracing::{debug, error, info, trace};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub attempted: usize,
    pub renamed: usize,
    /// Entries put back for the next sweep: still locked, or skipped by a shutdown.
    pub requeued: usize,
    pub dropped: usize,
    pub cancelled: bool,
}

/// Drain the pending queue, retry each rename once, and put the still-locked ones back.
///
/// Entries enqueued while this runs go to the now-empty queue and wait for the next
/// sweep; the leftovers are appended after them.
pub fn run_retry_sweep<M: FileMover>(
    executor: &RenameExecutor<M>,
    shutdown: &ShutdownToken,
) -> RetryReport {
    let mut report = RetryReport::default();
    let batch = executor.queue().drain();
    if batch.is_empty() {
        trace!("No pending renames to retry");
        return report;
    }
    debug!("Retrying {} pending renames", batch.len());

    let mut still_locked = Vec::new();
    let mut remaining = batch.into_iter();

    while let Some(entry) = remaining.next() {
        if shutdown.is_cancelled() {
            report.cancelled = true;
            still_locked.push(entry);
            still_locked.extend(remaining);
            break;
        }

        report.attempted += 1;
        match executor.execute(&entry.source, &entry.destination) {
            RenameOutcome::Renamed => {
                info!(
                    "Renamed {} -> {} on retry",
                    entry.source.display(),
                    entry.destination.display()
                );
                report.renamed += 1;
            }
            RenameOutcome::Locked => {
                debug!("{} is still in use", entry.source.display());
                still_locked.push(entry);
            }
            RenameOutcome::Failed(err) => {
                error!(
                    "Error retrying rename {} -> {}, giving up: {}",
                    entry.source.display(),
                    entry.destination.display(),
                    err
                );
                report.dropped += 1;
            }
        }
    }

    report.requeued = still_locked.len();
    executor.queue().requeue(still_locked);
    report
}
