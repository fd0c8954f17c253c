//! User store: account rows and the hash set scanned during login.

use async_trait::async_trait;

use crate::db::DbPool;
use crate::models::user::{User, UserCredential, UserOverview};
use crate::repositories::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user row.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Returns every stored (id, login_key_hash) pair. Login verification
    /// scans these; there is deliberately no lookup index on the secret
    /// because the hashes are salted.
    async fn credentials(&self) -> Result<Vec<UserCredential>, StoreError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Admin roll-up: every user with key and usage-event counts,
    /// newest first.
    async fn overview(&self) -> Result<Vec<UserOverview>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, login_key_hash, created_at) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.login_key_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn credentials(&self) -> Result<Vec<UserCredential>, StoreError> {
        let rows =
            sqlx::query_as::<_, UserCredential>("SELECT id, login_key_hash FROM users")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, login_key_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn overview(&self) -> Result<Vec<UserOverview>, StoreError> {
        let rows = sqlx::query_as::<_, UserOverview>(
            "SELECT u.id, u.created_at, \
             COUNT(DISTINCT uk.id) AS key_count, \
             COUNT(DISTINCT us.id) AS execution_count \
             FROM users u \
             LEFT JOIN user_keys uk ON u.id = uk.user_id \
             LEFT JOIN usage_stats us ON u.id = us.user_id \
             GROUP BY u.id, u.created_at \
             ORDER BY u.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
