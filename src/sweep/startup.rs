use crate::rename::{FileMover, RenameCandidate, RenameExecutor, RenameOutcome};
use crate::scanner;
use crate::shutdown::ShutdownToken;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub renamed: usize,
    pub queued: usize,
    pub failed: usize,
    /// Directories whose listing failed part way or couldn't start.
    pub skipped_directories: usize,
    pub cancelled: bool,
}

impl SweepReport {
    fn record(&mut self, outcome: &RenameOutcome) {
        match outcome {
            RenameOutcome::Renamed => self.renamed += 1,
            RenameOutcome::Locked => self.queued += 1,
            RenameOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// One pass over every watched directory, in configuration order, renaming whatever
/// currently carries an old-style timestamp. Runs before watches are enabled.
///
/// A directory that can't be listed is skipped without affecting the others.
/// Shutdown is checked before every file, so a cancelled sweep stops where it is.
pub fn run_startup_sweep<M: FileMover>(
    dirs: &[PathBuf],
    executor: &RenameExecutor<M>,
    shutdown: &ShutdownToken,
) -> SweepReport {
    let start = Instant::now();
    let mut report = SweepReport::default();

    for dir in dirs {
        if shutdown.is_cancelled() {
            report.cancelled = true;
            break;
        }
        sweep_directory(dir, executor, shutdown, &mut report);
        if report.cancelled {
            break;
        }
    }

    info!(
        "Startup sweep finished in {:.2}s: {} files, {} renamed, {} queued, {} failed{}",
        start.elapsed().as_secs_f64(),
        report.scanned,
        report.renamed,
        report.queued,
        report.failed,
        if report.cancelled { " (cancelled)" } else { "" }
    );

    report
}

fn sweep_directory<M: FileMover>(
    dir: &Path,
    executor: &RenameExecutor<M>,
    shutdown: &ShutdownToken,
    report: &mut SweepReport,
) {
    debug!("Sweeping {}", dir.display());

    for entry in scanner::list_files(dir) {
        if shutdown.is_cancelled() {
            report.cancelled = true;
            return;
        }

        let file = match entry {
            Ok(file) => file,
            Err(err) => {
                error!("Error listing directory {}: {}", dir.display(), err);
                report.skipped_directories += 1;
                return;
            }
        };

        report.scanned += 1;
        let candidate = RenameCandidate::new(dir, file.name);
        if let Some(outcome) = executor.process_candidate(&candidate) {
            report.record(&outcome);
        }
    }
}
