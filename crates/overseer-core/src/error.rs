use std::path::PathBuf;

use thiserror::Error;

use crate::domain::JobId;

#[derive(Debug, Error)]
pub enum OverseerError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    #[error("job id already in use: {0}")]
    DuplicateJobId(JobId),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures of the process itself, as opposed to a process that ran and
/// exited non-zero. Both variants crash the job.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),
}
