//! Job status state machine.

use serde::{Deserialize, Serialize};

/// Job status.
///
/// State transitions:
/// - Running -> Completed (exit code 0)
/// - Running | Retrying -> Retrying (non-zero exit, retries remain)
/// - Running | Retrying -> RetryFailed (non-zero exit, retries exhausted)
/// - Running | Retrying -> Crashed (spawn failure or OS error while running)
///
/// Nothing leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// An attempt is in flight.
    Running,

    /// The latest attempt exited with code 0.
    Completed,

    /// The process could not be launched, or the OS failed it mid-run.
    Crashed,

    /// The latest attempt failed; the next one starts after the retry delay.
    Retrying,

    /// Every allowed retry failed.
    RetryFailed,
}

impl JobStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Crashed | JobStatus::RetryFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Crashed => "crashed",
            JobStatus::Retrying => "retrying",
            JobStatus::RetryFailed => "retry_failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::running(JobStatus::Running, false)]
    #[case::retrying(JobStatus::Retrying, false)]
    #[case::completed(JobStatus::Completed, true)]
    #[case::crashed(JobStatus::Crashed, true)]
    #[case::retry_failed(JobStatus::RetryFailed, true)]
    fn terminal_states(#[case] status: JobStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[rstest]
    #[case(JobStatus::Running)]
    #[case(JobStatus::Completed)]
    #[case(JobStatus::Crashed)]
    #[case(JobStatus::Retrying)]
    #[case(JobStatus::RetryFailed)]
    fn serde_name_matches_display(#[case] status: JobStatus) {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{status}\""));
    }
}
