//! Session key store: issuance, lookup, and the one-way HWID bind.

use async_trait::async_trait;

use crate::db::DbPool;
use crate::models::session_key::{KeyDetail, SessionKey};
use crate::repositories::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionKeyStore: Send + Sync {
    /// Number of keys ever issued to a user.
    async fn count_for_user(&self, user_id: &str) -> Result<i64, StoreError>;

    /// Persists a newly issued key. Returns [`StoreError::Conflict`] when a
    /// uniqueness rule rejects the row (the user already holds a key, or a
    /// key value collided), which closes the issue-twice race at the
    /// storage layer.
    async fn insert(&self, key: &SessionKey) -> Result<(), StoreError>;

    /// Looks a key up by its plaintext value regardless of state.
    async fn find_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError>;

    /// Looks a key up by value, visible only while active. Usage reporting
    /// resolves the owner through this filter.
    async fn find_active_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError>;

    /// Compare-and-swap bind: sets the HWID only if the key is still
    /// unbound. Returns `false` when another claim already won the bind,
    /// in which case the caller re-reads and re-evaluates.
    async fn bind_hwid(&self, id: &str, hwid: &str) -> Result<bool, StoreError>;

    /// All keys for a user, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<SessionKey>, StoreError>;

    /// Flips the administrative active flag. Returns `false` when no such
    /// key exists.
    async fn set_active(&self, id: &str, active: bool) -> Result<bool, StoreError>;

    /// Admin roll-up of a user's keys with per-owner execution counts.
    async fn detail_for_user(&self, user_id: &str) -> Result<Vec<KeyDetail>, StoreError>;
}

#[derive(Clone)]
pub struct PgSessionKeyStore {
    pool: DbPool,
}

impl PgSessionKeyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionKeyStore for PgSessionKeyStore {
    async fn count_for_user(&self, user_id: &str) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_keys WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn insert(&self, key: &SessionKey) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO user_keys (id, user_id, session_key, hwid, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&key.id)
        .bind(&key.user_id)
        .bind(&key.session_key)
        .bind(&key.hwid)
        .bind(key.is_active)
        .bind(key.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError> {
        let key = sqlx::query_as::<_, SessionKey>(
            "SELECT id, user_id, session_key, hwid, is_active, created_at \
             FROM user_keys WHERE session_key = $1",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }

    async fn find_active_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError> {
        let key = sqlx::query_as::<_, SessionKey>(
            "SELECT id, user_id, session_key, hwid, is_active, created_at \
             FROM user_keys WHERE session_key = $1 AND is_active = TRUE",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }

    async fn bind_hwid(&self, id: &str, hwid: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE user_keys SET hwid = $2 WHERE id = $1 AND hwid IS NULL")
                .bind(id)
                .bind(hwid)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<SessionKey>, StoreError> {
        let keys = sqlx::query_as::<_, SessionKey>(
            "SELECT id, user_id, session_key, hwid, is_active, created_at \
             FROM user_keys WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE user_keys SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn detail_for_user(&self, user_id: &str) -> Result<Vec<KeyDetail>, StoreError> {
        let rows = sqlx::query_as::<_, KeyDetail>(
            "SELECT uk.session_key, uk.hwid, uk.is_active, uk.created_at, \
             COUNT(us.id) AS execution_count \
             FROM user_keys uk \
             LEFT JOIN usage_stats us ON uk.user_id = us.user_id \
             WHERE uk.user_id = $1 \
             GROUP BY uk.id, uk.session_key, uk.hwid, uk.is_active, uk.created_at \
             ORDER BY uk.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
