//! Periodic background jobs.

mod pool_metrics;
mod scheduler;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobScheduler};
