//! Submission input for a job.

use serde::{Deserialize, Serialize};

/// What the caller asks to run: a label plus the arguments handed to the
/// target executable, in order.
///
/// Validation (non-empty name) belongs to the boundary layer; the supervisor
/// takes this as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(rename = "jobName")]
    pub name: String,

    #[serde(default)]
    pub arguments: Vec<String>,
}

impl JobSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }
}
