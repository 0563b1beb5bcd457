//! Database Module
//!
//! Postgres connection pool for the local tournament history. The pool is
//! sized for a short-lived batch job, not a serving workload.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Database connection wrapper
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Connect with batch-job pool settings.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        tracing::info!("Database pool established: size={}", pool.size());

        Ok(Self { pool })
    }
}
