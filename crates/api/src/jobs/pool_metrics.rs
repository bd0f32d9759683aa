use persistence::{db, metrics as store_metrics};
use sqlx::PgPool;
use std::time::Duration;

use super::scheduler::Job;

/// Samples pool occupancy and round-trip latency.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "store_pool_sampler"
    }

    fn period(&self) -> Duration {
        Duration::from_secs(10)
    }

    async fn run(&self) -> Result<(), String> {
        store_metrics::record_pool_metrics(&self.pool);
        let latency = db::ping(&self.pool)
            .await
            .map_err(|e| format!("ping failed: {}", e))?;
        store_metrics::record_ping(latency);
        Ok(())
    }
}
