pub mod config;
pub mod error;
pub mod naming;
pub mod platform;
pub mod rename;
pub mod scanner;
pub mod service;
pub mod shutdown;
pub mod sweep;
pub mod watch;

pub use crate::config::AppConfig;
pub use error::Error;
pub use rename::queue::{PendingQueue, PendingRename};
pub use rename::{FileMover, FsMover, MoveError, RenameCandidate, RenameExecutor, RenameOutcome};
pub use service::{RenameService, ServiceState, ServiceSummary};
pub use shutdown::{ShutdownHandle, ShutdownToken};
