use anyhow::Result;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::time::Duration;

pub mod admins;
pub mod dashboard;
pub mod reservations;
pub mod students;
pub mod surveys;

#[derive(Clone)]
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .min_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool_config(database_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(60))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(900))
            .min_connections(min_connections)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Check if the database pool is healthy and has available connections
    pub async fn check_pool_health(&self) -> Result<bool> {
        match tokio::time::timeout(Duration::from_secs(5), self.pool.acquire()).await {
            Ok(Ok(_conn)) => Ok(true),
            Ok(Err(e)) => {
                tracing::warn!("Database pool health check failed: {}", e);
                Ok(false)
            }
            Err(_) => {
                tracing::warn!("Database pool health check timed out");
                Ok(false)
            }
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// True when the error came from a UNIQUE constraint (MySQL error 1062)
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
