//! overseer-core
//!
//! Launches named external jobs, supervises them asynchronously, retries
//! failed runs a bounded number of times and reports success patterns.
//!
//! # Modules
//! - **domain**: domain model (ids, spec, state, job, decision, outcome, stats)
//! - **ports**: abstractions (Clock, IdGenerator, ProcessRunner)
//! - **impls**: port implementations (TokioProcessRunner, ScriptedRunner)
//! - **app**: Supervisor, JobRegistry, EvictionLoop
//! - **analysis**: success-rate pattern mining over a snapshot
//! - **config**: SupervisorConfig
//! - **error**: error types

pub mod analysis;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{EvictionLoop, Supervisor, SupervisorBuilder};
pub use config::SupervisorConfig;
pub use domain::{JobId, JobPattern, JobRecord, JobSpec, JobStats, JobStatus};
pub use error::{OverseerError, RunnerError};
