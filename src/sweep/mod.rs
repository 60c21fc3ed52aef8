mod retry;
mod startup;

pub use retry::{run_retry_sweep, RetryReport};
pub use startup::{run_startup_sweep, SweepReport};
