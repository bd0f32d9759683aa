//! Interval scheduler for background jobs.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    /// Time between runs. The first run happens one period after start.
    fn period(&self) -> Duration;

    async fn run(&self) -> Result<(), String>;
}

/// Runs each registered job on its own interval until cancelled.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    cancel: CancellationToken,
    tasks: JoinSet<()>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let cancel = self.cancel.child_token();
            self.tasks.spawn(async move {
                let mut interval = tokio::time::interval(job.period());
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => run_once(job.as_ref()).await,
                    }
                }
                info!(job = job.name(), "Job stopped");
            });
        }
    }

    /// Cancels every job and waits up to `timeout` for the tasks to finish.
    pub async fn shutdown(mut self, timeout: Duration) {
        self.cancel.cancel();

        let drain = async {
            while let Some(result) = self.tasks.join_next().await {
                if let Err(e) = result {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(?timeout, "Job shutdown timed out");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_once(job: &dyn Job) {
    let start = Instant::now();
    match job.run().await {
        Ok(()) => tracing::debug!(
            job = job.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Job completed"
        ),
        Err(e) => error!(
            job = job.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            error = %e,
            "Job failed"
        ),
    }
}
