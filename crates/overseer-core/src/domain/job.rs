//! Job record and its in-place transitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::decision::{Decision, RetryPolicy};
use super::ids::JobId;
use super::outcome::ExitReport;
use super::spec::JobSpec;
use super::state::JobStatus;

/// Job record: one per submitted job, mutated in place across attempts.
///
/// Design:
/// - Single source of truth for the job's lifecycle.
/// - State transitions via methods (not direct field access).
/// - `output`/`error` hold only the latest attempt's streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,

    #[serde(rename = "jobName")]
    pub name: String,

    pub arguments: Vec<String>,

    pub status: JobStatus,

    pub start_time: DateTime<Utc>,

    /// Set when an attempt terminates; overwritten by every later attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    pub retry_count: u32,

    pub max_retries: u32,

    /// OS pid of the most recent attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new(id: JobId, spec: JobSpec, max_retries: u32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: spec.name,
            arguments: spec.arguments,
            status: JobStatus::Running,
            start_time: now,
            end_time: None,
            exit_code: None,
            retry_count: 0,
            max_retries,
            process_id: None,
            output: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// A new attempt has been launched. A retry attempt keeps `Retrying`
    /// until it exits.
    pub fn attach_process(&mut self, process_id: Option<u32>) {
        if self.is_terminal() {
            return;
        }
        self.process_id = process_id;
    }

    /// Apply a normal exit and return what should happen next.
    ///
    /// Returns `None` if the record is already terminal.
    pub fn record_exit(
        &mut self,
        at: DateTime<Utc>,
        report: ExitReport,
        policy: &RetryPolicy,
    ) -> Option<Decision> {
        if self.is_terminal() {
            return None;
        }

        self.end_time = Some(at);
        self.exit_code = report.exit_code;
        self.output = Some(report.stdout);
        self.error = Some(report.stderr);

        let retries = RetryPolicy {
            max_retries: self.max_retries,
            ..policy.clone()
        };
        let decision = retries.decide(report.exit_code, self.retry_count);
        match &decision {
            Decision::Complete => self.status = JobStatus::Completed,
            Decision::Retry { .. } => {
                self.status = JobStatus::Retrying;
                self.retry_count += 1;
            }
            Decision::GiveUp { .. } => self.status = JobStatus::RetryFailed,
        }
        Some(decision)
    }

    /// Launch failure or OS error: terminal, never retried.
    pub fn mark_crashed(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.end_time = Some(at);
        self.error = Some(message.into());
        self.status = JobStatus::Crashed;
    }

    /// Terminal and finished longer than `retention` before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        match self.end_time {
            Some(end) => self.is_terminal() && now.signed_duration_since(end) > retention,
            None => false,
        }
    }
}
