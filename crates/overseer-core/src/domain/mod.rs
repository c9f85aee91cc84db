//! Domain model (IDs, specs, records, decisions, report shapes).
//!
//! Nothing here touches processes, clocks or locks; the app layer feeds
//! timestamps and exit reports in.

pub mod decision;
pub mod ids;
pub mod job;
pub mod outcome;
pub mod spec;
pub mod state;
pub mod stats;

pub use decision::{Decision, RetryPolicy};
pub use ids::JobId;
pub use job::JobRecord;
pub use outcome::ExitReport;
pub use spec::JobSpec;
pub use state::JobStatus;
pub use stats::{JobPattern, JobStats};
