//! Supervisor - job lifecycle driver.
//!
//! Each submitted job gets one driver task that runs its attempts strictly
//! one after another:
//!
//! spawn -> wait -> decide -> (sleep -> spawn ...)
//!
//! Different jobs' drivers run concurrently with no shared limit. All record
//! mutation goes through one registry-wide mutex that is never held across a
//! process wait or the retry sleep.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::analysis::compute_stats;
use crate::app::registry::JobRegistry;
use crate::config::SupervisorConfig;
use crate::domain::{Decision, JobId, JobRecord, JobSpec, JobStats, RetryPolicy};
use crate::error::{OverseerError, RunnerError};
use crate::ports::{Clock, IdGenerator, ProcessRunner};

/// Cheap to clone; every clone drives the same registry.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Mutex<JobRegistry>,
    runner: Arc<dyn ProcessRunner>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: SupervisorConfig,
    policy: RetryPolicy,
    /// Bumped after every record mutation.
    revision: watch::Sender<u64>,
}

impl Supervisor {
    pub(crate) fn from_parts(
        config: SupervisorConfig,
        runner: Arc<dyn ProcessRunner>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let policy = config.retry_policy();
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(JobRegistry::new()),
                runner,
                clock,
                ids,
                config,
                policy,
                revision,
            }),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.inner.config
    }

    /// Register a job and launch its first attempt in the background.
    ///
    /// The returned record is the job as created (`Running`, no pid yet);
    /// later changes are visible through [`Supervisor::get_job`]. Fails only
    /// if the id generator hands out an id that is already registered; no
    /// attempt is launched in that case.
    pub async fn start_job(&self, spec: JobSpec) -> Result<JobRecord, OverseerError> {
        let id = self.inner.ids.generate_job_id();
        let now = self.inner.clock.now();
        let record = JobRecord::new(id, spec, self.inner.policy.max_retries, now);

        let inserted = {
            let mut registry = self.inner.registry.lock().await;
            registry.insert(record.clone())
        };
        if !inserted {
            error!(job_id = %id, job_name = %record.name, "job id already registered");
            return Err(OverseerError::DuplicateJobId(id));
        }
        self.inner.bump();

        info!(job_id = %id, job_name = %record.name, "starting job");

        let inner = Arc::clone(&self.inner);
        let args = record.arguments.clone();
        tokio::spawn(async move { inner.drive(id, args).await });

        Ok(record)
    }

    /// Every retained record, in submission order.
    pub async fn list_jobs(&self) -> Vec<JobRecord> {
        self.inner.registry.lock().await.snapshot()
    }

    pub async fn get_job(&self, id: JobId) -> Option<JobRecord> {
        self.inner.registry.lock().await.get(&id).cloned()
    }

    pub async fn require_job(&self, id: JobId) -> Result<JobRecord, OverseerError> {
        self.get_job(id).await.ok_or(OverseerError::JobNotFound(id))
    }

    /// Success statistics over a snapshot of the registry.
    pub async fn stats(&self) -> JobStats {
        let snapshot = self.list_jobs().await;
        compute_stats(&snapshot)
    }

    /// Remove finished jobs older than the retention window. Returns how many
    /// were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.inner.clock.now();
        let retention = chrono::Duration::from_std(self.inner.config.retention())
            .unwrap_or(chrono::Duration::MAX);

        let evicted = {
            let mut registry = self.inner.registry.lock().await;
            registry.evict_expired(now, retention)
        };

        for id in &evicted {
            debug!(job_id = %id, "evicted finished job");
        }
        if !evicted.is_empty() {
            self.inner.bump();
        }
        evicted.len()
    }

    /// Receiver that changes whenever any record changes or is evicted.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Wait until the job reaches a terminal state. `None` if the id is
    /// unknown or the record was evicted while waiting.
    pub async fn wait_for_settled(&self, id: JobId) -> Option<JobRecord> {
        let mut changes = self.subscribe();
        loop {
            let job = self.get_job(id).await?;
            if job.is_terminal() {
                return Some(job);
            }
            changes.changed().await.ok()?;
        }
    }

    /// Wait until every retained job is terminal and return the snapshot.
    pub async fn wait_for_all_settled(&self) -> Vec<JobRecord> {
        let mut changes = self.subscribe();
        loop {
            let jobs = self.list_jobs().await;
            if jobs.iter().all(JobRecord::is_terminal) {
                return jobs;
            }
            if changes.changed().await.is_err() {
                return jobs;
            }
        }
    }
}

impl Inner {
    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Apply `f` to the record under the registry lock.
    async fn update<T>(&self, id: JobId, f: impl FnOnce(&mut JobRecord) -> T) -> Option<T> {
        let result = {
            let mut registry = self.registry.lock().await;
            registry.get_mut(&id).map(f)
        };
        if result.is_some() {
            self.bump();
        }
        result
    }

    async fn drive(&self, id: JobId, args: Vec<String>) {
        loop {
            let process = match self.runner.spawn(&self.config.program, &args) {
                Ok(process) => process,
                Err(err) => {
                    self.crash(id, &err).await;
                    return;
                }
            };

            let pid = process.pid();
            debug!(job_id = %id, pid = ?pid, "attempt started");
            if self.update(id, |job| job.attach_process(pid)).await.is_none() {
                return;
            }

            let report = match process.wait().await {
                Ok(report) => report,
                Err(err) => {
                    self.crash(id, &err).await;
                    return;
                }
            };

            let now = self.clock.now();
            let outcome = self
                .update(id, |job| {
                    job.record_exit(now, report, &self.policy)
                        .map(|decision| (decision, job.retry_count, job.max_retries))
                })
                .await
                .flatten();

            match outcome {
                Some((Decision::Complete, _, _)) => {
                    info!(job_id = %id, "job completed successfully");
                    return;
                }
                Some((Decision::Retry { delay, reason }, retry_count, max_retries)) => {
                    warn!(
                        job_id = %id,
                        %reason,
                        "job failed, retrying ({}/{})",
                        retry_count,
                        max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Some((Decision::GiveUp { reason }, _, max_retries)) => {
                    error!(job_id = %id, %reason, "job failed after {} retries", max_retries);
                    return;
                }
                None => return,
            }
        }
    }

    async fn crash(&self, id: JobId, err: &RunnerError) {
        let now = self.clock.now();
        let message = err.to_string();
        error!(job_id = %id, error = %message, "job crashed");
        self.update(id, |job| job.mark_crashed(now, message)).await;
    }
}
