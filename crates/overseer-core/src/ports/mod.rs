//! Ports - abstraction layer
//!
//! Seams between the supervisor and the outside world: time, id allocation
//! and process launching. Each has a production implementation and a
//! deterministic one for tests.

pub mod clock;
pub mod id_generator;
pub mod process;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::process::{ProcessRunner, RunningProcess};
