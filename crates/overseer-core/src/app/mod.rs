//! App - the application layer
//!
//! Combines the ports into the running service.
//!
//! # Components
//! - **SupervisorBuilder**: wiring and config validation
//! - **Supervisor**: job submission, attempt driving, queries
//! - **JobRegistry**: the in-memory record store
//! - **EvictionLoop**: periodic removal of finished jobs

pub mod builder;
pub mod eviction;
pub mod registry;
pub mod supervisor;

pub use self::builder::SupervisorBuilder;
pub use self::eviction::EvictionLoop;
pub use self::registry::JobRegistry;
pub use self::supervisor::Supervisor;
