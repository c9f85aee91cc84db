//! Domain identifiers (strongly-typed IDs).
//!
//! Job ids are ULIDs: sortable by creation time and generated without
//! coordination. The `job-` prefix only appears in `Display`; the wire form
//! is the bare ULID string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

const JOB_PREFIX: &str = "job-";

/// Identifier of a Job (submit/status unit).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Ulid);

impl JobId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }

    /// Milliseconds since the epoch encoded in the id.
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl From<Ulid> for JobId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", JOB_PREFIX, self.0)
    }
}

/// Accepts both `job-<ulid>` and the bare ULID.
impl FromStr for JobId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(JOB_PREFIX).unwrap_or(s);
        Ulid::from_string(raw).map(Self)
    }
}
