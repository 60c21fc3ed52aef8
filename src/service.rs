use crate::config::{self, AppConfig};
use crate::rename::{FileMover, FsMover, RenameExecutor};
use crate::shutdown::ShutdownToken;
use crate::sweep::{self, RetryReport, SweepReport};
use crate::watch::{self, WatchSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Initializing,
    Running,
    Stopping,
}

/// Totals for one service run, from start until shutdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    pub directories: usize,
    pub active_watches: usize,
    pub startup: SweepReport,
    pub retry_sweeps: usize,
    pub retried_renames: usize,
    pub dropped_retries: usize,
    pub pending_at_shutdown: usize,
}

impl ServiceSummary {
    fn record_retry(&mut self, report: &RetryReport) {
        self.retry_sweeps += 1;
        self.retried_renames += report.renamed;
        self.dropped_retries += report.dropped;
    }
}

/// Owns the watch registry and the retry loop.
pub struct RenameService<M = FsMover> {
    watch_list: PathBuf,
    retry_interval: Duration,
    executor: Arc<RenameExecutor<M>>,
    watches: Option<WatchSet>,
    state: ServiceState,
}

impl RenameService<FsMover> {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_executor(config, RenameExecutor::new())
    }
}

impl<M: FileMover + 'static> RenameService<M> {
    pub fn with_executor(config: &AppConfig, executor: RenameExecutor<M>) -> Self {
        Self {
            watch_list: config.watch_list_path(),
            retry_interval: config.retry_interval(),
            executor: Arc::new(executor),
            watches: None,
            state: ServiceState::Stopped,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn executor(&self) -> &Arc<RenameExecutor<M>> {
        &self.executor
    }

    /// Run until `shutdown` fires: sweep once, enable watches, then retry the pending
    /// queue every interval. Nothing in here is fatal; failures degrade to fewer
    /// watched directories or a longer queue.
    pub fn run(&mut self, shutdown: &ShutdownToken) -> ServiceSummary {
        let dirs = self.initialize();
        let mut summary = ServiceSummary {
            directories: dirs.len(),
            ..ServiceSummary::default()
        };

        self.transition(ServiceState::Running);
        summary.startup = sweep::run_startup_sweep(&dirs, &*self.executor, shutdown);

        if !shutdown.is_cancelled() {
            if let Some(watches) = self.watches.as_mut() {
                summary.active_watches = watches.enable();
            }
            info!(
                "Watching {} of {} directories, retrying locked files every {}s",
                summary.active_watches,
                summary.directories,
                self.retry_interval.as_secs()
            );

            while !shutdown.wait(self.retry_interval) {
                let report = sweep::run_retry_sweep(&*self.executor, shutdown);
                summary.record_retry(&report);
            }
        }

        self.stop();
        summary.pending_at_shutdown = self.executor.queue().len();
        if summary.pending_at_shutdown > 0 {
            warn!(
                "{} locked files were still pending at shutdown; the next startup sweep picks them up",
                summary.pending_at_shutdown
            );
        }
        summary
    }

    fn initialize(&mut self) -> Vec<PathBuf> {
        self.transition(ServiceState::Initializing);
        self.teardown_watches();

        let dirs = config::load_watch_dirs_or_empty(&self.watch_list);
        debug!("Watched directories: {:?}", dirs);

        let executor = Arc::clone(&self.executor);
        self.watches = Some(WatchSet::establish(&dirs, move |path| {
            watch::handle_created(&*executor, path);
        }));

        dirs
    }

    fn stop(&mut self) {
        self.transition(ServiceState::Stopping);
        self.teardown_watches();
        self.transition(ServiceState::Stopped);
    }

    fn teardown_watches(&mut self) {
        if let Some(mut watches) = self.watches.take() {
            watches.teardown();
        }
    }

    fn transition(&mut self, next: ServiceState) {
        debug!("Service {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
