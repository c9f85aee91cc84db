//! SupervisorBuilder - wiring the supervisor's ports together
//!
//! Config is validated at build time so a bad setup fails before the first
//! job is accepted.

use std::sync::Arc;

use crate::app::supervisor::Supervisor;
use crate::config::SupervisorConfig;
use crate::error::OverseerError;
use crate::impls::TokioProcessRunner;
use crate::ports::{Clock, IdGenerator, ProcessRunner, SystemClock, UlidGenerator};

/// Builds a [`Supervisor`].
///
/// # Example
/// ```ignore
/// let supervisor = SupervisorBuilder::new(SupervisorConfig::default())
///     .runner(Arc::new(ScriptedRunner::always(ScriptedStep::exit(0))))
///     .clock(clock.clone())
///     .build()?;
/// ```
///
/// Unset ports default to the production ones: real subprocesses, the wall
/// clock and ULID ids stamped by that clock.
pub struct SupervisorBuilder {
    config: SupervisorConfig,
    runner: Option<Arc<dyn ProcessRunner>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl SupervisorBuilder {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            runner: None,
            clock: None,
            ids: None,
        }
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<Supervisor, OverseerError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));
        let runner = self
            .runner
            .unwrap_or_else(|| Arc::new(TokioProcessRunner::new()));

        Ok(Supervisor::from_parts(self.config, runner, clock, ids))
    }
}
