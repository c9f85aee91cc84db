//! ScriptedRunner - a process runner that never touches the OS.
//!
//! Each `spawn` consumes the next queued step; once the queue is empty the
//! fallback rule decides. Used by tests and by the CLI's `--dry-run`.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ExitReport;
use crate::error::RunnerError;
use crate::ports::{ProcessRunner, RunningProcess};

/// What one scripted attempt does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedStep {
    /// Start fine, then exit with `report` once `after` has elapsed.
    Exit { report: ExitReport, after: Duration },

    /// Refuse to start.
    SpawnFailure(String),

    /// Start, then fail at the OS level instead of exiting.
    WaitFailure(String),
}

impl ScriptedStep {
    pub fn exit(code: i32) -> Self {
        Self::exit_after(code, Duration::ZERO)
    }

    pub fn exit_after(code: i32, after: Duration) -> Self {
        ScriptedStep::Exit {
            report: ExitReport::with_code(code),
            after,
        }
    }

    pub fn report(report: ExitReport) -> Self {
        ScriptedStep::Exit {
            report,
            after: Duration::ZERO,
        }
    }
}

type Rule = Box<dyn Fn(&[String]) -> ScriptedStep + Send + Sync>;

pub struct ScriptedRunner {
    queued: Mutex<VecDeque<ScriptedStep>>,
    fallback: Rule,
    calls: Mutex<Vec<Vec<String>>>,
    next_pid: AtomicU32,
}

impl ScriptedRunner {
    /// Every attempt performs `step`.
    pub fn always(step: ScriptedStep) -> Self {
        Self::from_fn(move |_| step.clone())
    }

    /// Decide each attempt from the arguments it was launched with.
    pub fn from_fn<F>(rule: F) -> Self
    where
        F: Fn(&[String]) -> ScriptedStep + Send + Sync + 'static,
    {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: Box::new(rule),
            calls: Mutex::new(Vec::new()),
            next_pid: AtomicU32::new(1000),
        }
    }

    /// Queue steps that run before the fallback rule kicks in.
    pub fn then(self, steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        lock(&self.queued).extend(steps);
        self
    }

    /// Argument lists of every `spawn`, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProcessRunner for ScriptedRunner {
    fn spawn(
        &self,
        program: &Path,
        args: &[String],
    ) -> Result<Box<dyn RunningProcess>, RunnerError> {
        lock(&self.calls).push(args.to_vec());

        let queued = lock(&self.queued).pop_front();
        let step = queued.unwrap_or_else(|| (self.fallback)(args));

        if let ScriptedStep::SpawnFailure(message) = step {
            return Err(RunnerError::Spawn {
                program: program.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            });
        }

        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(ScriptedProcess { pid, step }))
    }
}

struct ScriptedProcess {
    pid: u32,
    step: ScriptedStep,
}

#[async_trait]
impl RunningProcess for ScriptedProcess {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    async fn wait(self: Box<Self>) -> Result<ExitReport, RunnerError> {
        match self.step {
            ScriptedStep::Exit { report, after } => {
                if !after.is_zero() {
                    tokio::time::sleep(after).await;
                }
                Ok(report)
            }
            ScriptedStep::WaitFailure(message) => Err(RunnerError::Wait(std::io::Error::other(
                message,
            ))),
            // handled in spawn
            ScriptedStep::SpawnFailure(message) => Err(RunnerError::Wait(
                std::io::Error::other(message),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_steps_run_before_fallback() {
        let runner = ScriptedRunner::always(ScriptedStep::exit(0))
            .then([ScriptedStep::exit(2)]);
        let program = Path::new("job");

        let first = runner.spawn(program, &[]).unwrap().wait().await.unwrap();
        let second = runner.spawn(program, &[]).unwrap().wait().await.unwrap();

        assert_eq!(first.exit_code, Some(2));
        assert_eq!(second.exit_code, Some(0));
        assert_eq!(runner.call_count(), 2);
    }

    #[tokio::test]
    async fn rule_sees_arguments() {
        let runner = ScriptedRunner::from_fn(|args| {
            if args.iter().any(|a| a == "--fail") {
                ScriptedStep::exit(1)
            } else {
                ScriptedStep::exit(0)
            }
        });
        let args = vec!["--fail".to_string()];

        let report = runner.spawn(Path::new("job"), &args).unwrap().wait().await.unwrap();

        assert_eq!(report.exit_code, Some(1));
        assert_eq!(runner.calls(), vec![args]);
    }

    #[test]
    fn spawn_failure_never_yields_a_process() {
        let runner = ScriptedRunner::always(ScriptedStep::SpawnFailure("denied".into()));
        let err = runner.spawn(Path::new("job"), &[]).err().unwrap();
        assert!(err.to_string().contains("denied"));
    }

    #[tokio::test]
    async fn wait_failure_surfaces_as_wait_error() {
        let runner = ScriptedRunner::always(ScriptedStep::WaitFailure("lost child".into()));
        let process = runner.spawn(Path::new("job"), &[]).unwrap();
        assert!(process.pid().is_some());

        let err = process.wait().await.unwrap_err();
        assert!(matches!(err, RunnerError::Wait(_)));
    }
}
