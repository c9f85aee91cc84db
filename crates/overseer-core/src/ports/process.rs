//! Process port - launching the target executable.
//!
//! An attempt has two phases with different failure meanings:
//! - `spawn`: an `Err` is a launch failure (missing binary, permissions).
//! - `wait`: an `Err` is an OS-level failure while the process runs;
//!   `Ok(ExitReport)` is a normal exit, whatever its code.
//!
//! The supervisor owns the retry logic; runners only report what happened.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::ExitReport;
use crate::error::RunnerError;

pub trait ProcessRunner: Send + Sync {
    /// Start `program` with `args` verbatim, in order. Must not block on the
    /// process itself.
    fn spawn(&self, program: &Path, args: &[String]) -> Result<Box<dyn RunningProcess>, RunnerError>;
}

/// A launched attempt. The owner must eventually `wait` on it.
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if the platform reports one.
    fn pid(&self) -> Option<u32>;

    /// Resolve when the process exits, with its captured output.
    async fn wait(self: Box<Self>) -> Result<ExitReport, RunnerError>;
}
