//! Store-level metrics: per-query latency and connection pool occupancy.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

pub const QUERY_DURATION_SECONDS: &str = "patrika_store_query_duration_seconds";
pub const POOL_CONNECTIONS: &str = "patrika_store_pool_connections";
pub const PING_SECONDS: &str = "patrika_store_ping_seconds";

pub fn record_query_duration(query: &'static str, elapsed: Duration) {
    histogram!(QUERY_DURATION_SECONDS, "query" => query).record(elapsed.as_secs_f64());
}

/// Publishes pool occupancy. Sampled by the background pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let in_use = size.saturating_sub(idle);

    gauge!(POOL_CONNECTIONS, "state" => "in_use").set(in_use as f64);
    gauge!(POOL_CONNECTIONS, "state" => "idle").set(idle as f64);
    gauge!(POOL_CONNECTIONS, "state" => "total").set(size as f64);
}

pub fn record_ping(latency: Duration) {
    gauge!(PING_SECONDS).set(latency.as_secs_f64());
}

/// Times one repository query; call [`QueryTimer::record`] once it returns.
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn record(self) {
        record_query_duration(self.query, self.elapsed());
    }
}
