//! EvictionLoop - periodic removal of finished jobs
//!
//! # Flow
//! 1. Wait for the next tick of the sweep interval
//! 2. `Supervisor::sweep_expired()` drops terminal records past retention
//! 3. Repeat until shutdown is requested

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::app::Supervisor;

/// Handle to the background sweep task.
/// - `request_shutdown` stops it after the current sweep
/// - `shutdown_and_join` also waits for it to exit
/// - dropping the handle detaches the task; sweeping continues for as long
///   as the runtime lives
pub struct EvictionLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl EvictionLoop {
    /// Start sweeping every `sweep_interval` from the supervisor's config.
    /// The first sweep happens one full interval after start.
    pub fn spawn(supervisor: Supervisor) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = supervisor.config().sweep_interval();

        let join = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately on the first tick
            ticker.tick().await;

            info!(
                interval_secs = period.as_secs(),
                retention_secs = supervisor.config().retention_secs,
                "eviction loop started"
            );

            let mut detached = false;
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed(), if !detached => {
                        match changed {
                            Ok(()) if *shutdown_rx.borrow() => {
                                info!("eviction loop shutting down");
                                break;
                            }
                            Ok(()) => {}
                            Err(_) => {
                                debug!("eviction handle dropped, sweeping detached");
                                detached = true;
                            }
                        }
                    }
                    _ = ticker.tick() => {
                        let evicted = supervisor.sweep_expired().await;
                        debug!(evicted, "eviction sweep finished");
                    }
                }
            }
        });

        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // receiver is gone only if the task already ended
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}
