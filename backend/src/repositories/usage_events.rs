//! Usage log store: append-only inserts plus per-user aggregates.

use async_trait::async_trait;

use crate::db::DbPool;
use crate::models::usage_event::{UsageEvent, UsageSummary};
use crate::repositories::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Appends one immutable event. Every call is an independent insert;
    /// there is no batching or deduplication.
    async fn append(&self, event: &UsageEvent) -> Result<(), StoreError>;

    /// Execution count and most recent event timestamp for a user.
    async fn summary_for_user(&self, user_id: &str) -> Result<UsageSummary, StoreError>;
}

#[derive(Clone)]
pub struct PgUsageStore {
    pool: DbPool,
}

impl PgUsageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageStore for PgUsageStore {
    async fn append(&self, event: &UsageEvent) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO usage_stats (user_id, event_type, metadata, timestamp) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&event.user_id)
        .bind(&event.event_type)
        .bind(&event.metadata)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn summary_for_user(&self, user_id: &str) -> Result<UsageSummary, StoreError> {
        let summary = sqlx::query_as::<_, UsageSummary>(
            "SELECT COUNT(*) AS total_executions, MAX(timestamp) AS last_used \
             FROM usage_stats WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
