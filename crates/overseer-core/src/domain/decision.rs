//! Decision model: what follows an attempt that exited normally.
//!
//! Launch failures and OS errors never reach this module. They crash the job
//! directly and are not retried.

use std::time::Duration;

/// Retry policy for jobs whose process exited with a non-zero code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,

    /// Fixed wait before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Decide the next step after a normal exit.
    ///
    /// # Arguments
    /// * `exit_code` - `None` when the process ended without a code (signal)
    /// * `retry_count` - retries already consumed by this job
    pub fn decide(&self, exit_code: Option<i32>, retry_count: u32) -> Decision {
        if exit_code == Some(0) {
            return Decision::Complete;
        }
        if retry_count < self.max_retries {
            Decision::Retry {
                delay: self.delay,
                reason: format!(
                    "exit code {}, retry {}/{}",
                    describe_code(exit_code),
                    retry_count + 1,
                    self.max_retries
                ),
            }
        } else {
            Decision::GiveUp {
                reason: format!(
                    "exit code {} after {} retries",
                    describe_code(exit_code),
                    self.max_retries
                ),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_secs(1))
    }
}

fn describe_code(exit_code: Option<i32>) -> String {
    exit_code.map_or_else(|| "none".to_string(), |code| code.to_string())
}

/// The next action for a job after a normal exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Exit code 0. Terminal.
    Complete,

    /// Run another attempt after `delay`.
    Retry { delay: Duration, reason: String },

    /// Retries exhausted. Terminal.
    GiveUp { reason: String },
}

impl Decision {
    pub fn is_retry(&self) -> bool {
        matches!(self, Decision::Retry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_policy_matches_fixed_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[rstest]
    #[case::first_attempt(0)]
    #[case::after_retry(1)]
    fn zero_exit_completes(#[case] retry_count: u32) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.decide(Some(0), retry_count), Decision::Complete);
    }

    #[rstest]
    #[case::non_zero(Some(1))]
    #[case::negative(Some(-1))]
    #[case::signalled(None)]
    fn failure_with_retries_left_retries(#[case] exit_code: Option<i32>) {
        let policy = RetryPolicy::new(2, Duration::from_millis(250));

        match policy.decide(exit_code, 1) {
            Decision::Retry { delay, reason } => {
                assert_eq!(delay, Duration::from_millis(250));
                assert!(reason.contains("retry 2/2"));
            }
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn failure_with_retries_exhausted_gives_up() {
        let policy = RetryPolicy::default();

        let decision = policy.decide(Some(3), 1);
        assert!(matches!(decision, Decision::GiveUp { ref reason } if reason.contains("exit code 3")));
        assert!(!decision.is_retry());
    }

    #[test]
    fn zero_retries_gives_up_immediately() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert!(matches!(policy.decide(Some(1), 0), Decision::GiveUp { .. }));
    }
}
