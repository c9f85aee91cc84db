//! Supervisor configuration.
//!
//! Defaults are the fixed operating constants: one retry after one second, a
//! sweep every five minutes, one hour of retention for finished jobs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::RetryPolicy;
use crate::error::OverseerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Executable launched for every job. Relative paths are resolved
    /// against the working directory by [`SupervisorConfig::resolve_program`].
    #[serde(default = "default_program")]
    pub program: PathBuf,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Minimum age of a finished job before the sweep removes it.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_program() -> PathBuf {
    PathBuf::from("scripts").join("job.sh")
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_retention_secs() -> u64 {
    3_600 // 1 hour
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            retention_secs: default_retention_secs(),
        }
    }
}

impl SupervisorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OverseerError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Stored in whole milliseconds; sub-millisecond parts are dropped and
    /// delays beyond `u64::MAX` ms saturate.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    pub fn with_retention_secs(mut self, secs: u64) -> Self {
        self.retention_secs = secs;
        self
    }

    pub fn validate(&self) -> Result<(), OverseerError> {
        if self.sweep_interval_secs == 0 {
            return Err(OverseerError::Config(
                "sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.retention_secs == 0 {
            return Err(OverseerError::Config(
                "retention_secs must be greater than 0".to_string(),
            ));
        }
        if self.program.as_os_str().is_empty() {
            return Err(OverseerError::Config("program must not be empty".to_string()));
        }
        Ok(())
    }

    /// Anchor a relative program path to `cwd`, once, at startup.
    pub fn resolve_program(mut self, cwd: &Path) -> Self {
        if self.program.is_relative() {
            self.program = cwd.join(&self.program);
        }
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_fixed_constants() {
        let config = SupervisorConfig::default();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.sweep_interval(), Duration::from_secs(5 * 60));
        assert_eq!(config.retention(), Duration::from_secs(60 * 60));
        assert_eq!(config.program, PathBuf::from("scripts/job.sh"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = SupervisorConfig::new()
            .with_program("/usr/bin/true")
            .with_max_retries(3)
            .with_retry_delay(Duration::from_millis(10))
            .with_sweep_interval_secs(30)
            .with_retention_secs(120);

        assert_eq!(config.program, PathBuf::from("/usr/bin/true"));
        assert_eq!(config.retry_policy(), RetryPolicy::new(3, Duration::from_millis(10)));
        assert_eq!(config.sweep_interval_secs, 30);
        assert_eq!(config.retention_secs, 120);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SupervisorConfig = serde_json::from_str(r#"{"max_retries": 4}"#).unwrap();
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(config.retention_secs, 3_600);
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let err = SupervisorConfig::new()
            .with_sweep_interval_secs(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, OverseerError::Config(_)));

        let err = SupervisorConfig::new()
            .with_retention_secs(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("retention_secs"));
    }

    #[test]
    fn huge_retry_delay_saturates() {
        let config = SupervisorConfig::new().with_retry_delay(Duration::MAX);
        assert_eq!(config.retry_delay_ms, u64::MAX);

        let config = SupervisorConfig::new().with_retry_delay(Duration::from_micros(1_500));
        assert_eq!(config.retry_delay(), Duration::from_millis(1));
    }

    #[test]
    fn relative_program_is_anchored_to_cwd() {
        let cwd = Path::new("/srv/app");

        let relative = SupervisorConfig::new().resolve_program(cwd);
        assert_eq!(relative.program, PathBuf::from("/srv/app/scripts/job.sh"));

        let absolute = SupervisorConfig::new()
            .with_program("/opt/bin/job")
            .resolve_program(cwd);
        assert_eq!(absolute.program, PathBuf::from("/opt/bin/job"));
    }
}
