//! Outcome of one attempt that ran to a normal exit.

use serde::{Deserialize, Serialize};

/// What a finished process left behind: its exit code and the text captured
/// from its standard streams during the attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReport {
    /// `None` when the process ended without a code (killed by a signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExitReport {
    pub fn with_code(exit_code: i32) -> Self {
        Self {
            exit_code: Some(exit_code),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_is_success() {
        assert!(ExitReport::with_code(0).success());
        assert!(!ExitReport::with_code(2).success());
        assert!(!ExitReport::default().success());
    }
}
