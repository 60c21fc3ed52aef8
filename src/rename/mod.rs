pub mod queue;

use crate::naming;
use crate::platform;
use queue::{PendingQueue, PendingRename};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, trace, warn};

/// Why the OS refused a rename. Only `ShareViolation` is worth retrying.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("file is in use by another process")]
    ShareViolation,

    #[error("source file not found")]
    FileNotFound,

    #[error("directory not found")]
    DirectoryNotFound,

    #[error("path too long")]
    PathTooLong,

    #[error("access denied")]
    AccessDenied,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("destination already exists")]
    AlreadyExists,

    #[error("IO error: {0}")]
    Other(#[source] io::Error),
}

impl MoveError {
    /// Classify an OS error raised while renaming `source`.
    pub fn from_io(err: io::Error, source: &Path) -> Self {
        if platform::is_sharing_violation(&err) {
            return MoveError::ShareViolation;
        }
        if platform::is_path_too_long(&err) {
            return MoveError::PathTooLong;
        }

        match err.kind() {
            io::ErrorKind::NotFound => {
                let parent_exists = source.parent().is_some_and(Path::is_dir);
                if parent_exists {
                    MoveError::FileNotFound
                } else {
                    MoveError::DirectoryNotFound
                }
            }
            io::ErrorKind::PermissionDenied => MoveError::AccessDenied,
            io::ErrorKind::AlreadyExists => MoveError::AlreadyExists,
            io::ErrorKind::InvalidInput => MoveError::InvalidArgument,
            _ => MoveError::Other(err),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, MoveError::ShareViolation)
    }
}

/// How a single rename attempt ended.
#[derive(Debug)]
pub enum RenameOutcome {
    Renamed,
    /// Source held open elsewhere; try again on the next retry sweep.
    Locked,
    Failed(MoveError),
}

impl RenameOutcome {
    fn from_result(result: Result<(), MoveError>) -> Self {
        match result {
            Ok(()) => RenameOutcome::Renamed,
            Err(err) if err.is_transient() => RenameOutcome::Locked,
            Err(err) => RenameOutcome::Failed(err),
        }
    }
}

/// The rename boundary. Implementations must not replace an existing destination.
pub trait FileMover: Send + Sync {
    fn rename_file(&self, from: &Path, to: &Path) -> Result<(), MoveError>;
}

/// Renames on the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl FileMover for FsMover {
    fn rename_file(&self, from: &Path, to: &Path) -> Result<(), MoveError> {
        platform::rename_no_replace(from, to).map_err(|err| MoveError::from_io(err, from))
    }
}

/// A file name seen in a watched directory, either by a sweep or a creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCandidate {
    pub directory: PathBuf,
    pub file_name: String,
}

impl RenameCandidate {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    /// Split a full path. `None` for paths without a parent or a UTF-8 file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let directory = path.parent()?;
        Some(Self::new(directory, file_name))
    }

    pub fn source(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Where the file should end up, or `None` when its name carries no timestamp.
    pub fn planned(&self) -> Option<PendingRename> {
        let new_name = naming::transform(&self.file_name);
        if new_name == self.file_name {
            return None;
        }
        Some(PendingRename {
            source: self.source(),
            destination: self.directory.join(new_name.as_ref()),
        })
    }
}

/// Performs renames and routes locked files to the shared pending queue.
pub struct RenameExecutor<M = FsMover> {
    mover: M,
    queue: Arc<PendingQueue>,
}

impl RenameExecutor<FsMover> {
    pub fn new() -> Self {
        Self::with_mover(FsMover)
    }
}

impl Default for RenameExecutor<FsMover> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FileMover> RenameExecutor<M> {
    pub fn with_mover(mover: M) -> Self {
        Self {
            mover,
            queue: Arc::new(PendingQueue::new()),
        }
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    pub fn queue(&self) -> &Arc<PendingQueue> {
        &self.queue
    }

    /// Attempt one rename and classify the result. Logging is left to the caller.
    pub fn execute(&self, from: &Path, to: &Path) -> RenameOutcome {
        trace!("Renaming {} -> {}", from.display(), to.display());
        RenameOutcome::from_result(self.mover.rename_file(from, to))
    }

    /// Shared path for sweep entries and creation events: transform the name, rename
    /// if it changed, and queue the rename when the file is locked.
    ///
    /// Returns `None` when the name carries no timestamp.
    pub fn process_candidate(&self, candidate: &RenameCandidate) -> Option<RenameOutcome> {
        let planned = candidate.planned()?;
        let outcome = self.execute(&planned.source, &planned.destination);

        match &outcome {
            RenameOutcome::Renamed => info!(
                "Renamed {} -> {}",
                planned.source.display(),
                planned.destination.display()
            ),
            RenameOutcome::Locked => {
                warn!(
                    "{} is in use, queued for retry",
                    planned.source.display()
                );
                self.queue.enqueue(planned);
            }
            RenameOutcome::Failed(err) => error!(
                "Error renaming {} -> {}: {}",
                planned.source.display(),
                planned.destination.display(),
                err
            ),
        }

        Some(outcome)
    }
}
