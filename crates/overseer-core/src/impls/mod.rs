//! Impls - port implementations
//!
//! - **TokioProcessRunner**: real subprocesses (production)
//! - **ScriptedRunner**: scripted outcomes without the OS (tests, dry runs)

pub mod scripted;
pub mod tokio_runner;

pub use self::scripted::{ScriptedRunner, ScriptedStep};
pub use self::tokio_runner::TokioProcessRunner;
