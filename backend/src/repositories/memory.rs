//! In-memory store used by the integration tests.
//!
//! Implements every store trait over mutex-guarded vectors so the full
//! router can be exercised without a database. Mirrors the storage-level
//! rules the Postgres schema enforces, in particular the one-key-per-user
//! uniqueness and the unbound-only HWID update.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::session_key::{KeyDetail, SessionKey};
use crate::models::usage_event::{UsageEvent, UsageSummary};
use crate::models::user::{User, UserCredential, UserOverview};
use crate::repositories::{SessionKeyStore, StoreError, UsageStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    keys: Mutex<Vec<SessionKey>>,
    events: Mutex<Vec<UsageEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Conflict);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn credentials(&self) -> Result<Vec<UserCredential>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .map(|u| UserCredential {
                id: u.id.clone(),
                login_key_hash: u.login_key_hash.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn overview(&self) -> Result<Vec<UserOverview>, StoreError> {
        let users = self.users.lock().unwrap();
        let keys = self.keys.lock().unwrap();
        let events = self.events.lock().unwrap();
        let mut rows: Vec<UserOverview> = users
            .iter()
            .map(|u| UserOverview {
                id: u.id.clone(),
                created_at: u.created_at,
                key_count: keys.iter().filter(|k| k.user_id == u.id).count() as i64,
                execution_count: events.iter().filter(|e| e.user_id == u.id).count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl SessionKeyStore for MemoryStore {
    async fn count_for_user(&self, user_id: &str) -> Result<i64, StoreError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.iter().filter(|k| k.user_id == user_id).count() as i64)
    }

    async fn insert(&self, key: &SessionKey) -> Result<(), StoreError> {
        let mut keys = self.keys.lock().unwrap();
        if keys
            .iter()
            .any(|k| k.user_id == key.user_id || k.session_key == key.session_key)
        {
            return Err(StoreError::Conflict);
        }
        keys.push(key.clone());
        Ok(())
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.iter().find(|k| k.session_key == value).cloned())
    }

    async fn find_active_by_value(&self, value: &str) -> Result<Option<SessionKey>, StoreError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .iter()
            .find(|k| k.session_key == value && k.is_active)
            .cloned())
    }

    async fn bind_hwid(&self, id: &str, hwid: &str) -> Result<bool, StoreError> {
        let mut keys = self.keys.lock().unwrap();
        match keys.iter_mut().find(|k| k.id == id && k.hwid.is_none()) {
            Some(key) => {
                key.hwid = Some(hwid.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<SessionKey>, StoreError> {
        let keys = self.keys.lock().unwrap();
        let mut rows: Vec<SessionKey> = keys
            .iter()
            .filter(|k| k.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<bool, StoreError> {
        let mut keys = self.keys.lock().unwrap();
        match keys.iter_mut().find(|k| k.id == id) {
            Some(key) => {
                key.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn detail_for_user(&self, user_id: &str) -> Result<Vec<KeyDetail>, StoreError> {
        let keys = self.keys.lock().unwrap();
        let events = self.events.lock().unwrap();
        let execution_count = events.iter().filter(|e| e.user_id == user_id).count() as i64;
        let mut rows: Vec<KeyDetail> = keys
            .iter()
            .filter(|k| k.user_id == user_id)
            .map(|k| KeyDetail {
                session_key: k.session_key.clone(),
                hwid: k.hwid.clone(),
                is_active: k.is_active,
                created_at: k.created_at,
                execution_count,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn append(&self, event: &UsageEvent) -> Result<(), StoreError> {
        let mut events = self.events.lock().unwrap();
        events.push(event.clone());
        Ok(())
    }

    async fn summary_for_user(&self, user_id: &str) -> Result<UsageSummary, StoreError> {
        let events = self.events.lock().unwrap();
        let for_user: Vec<&UsageEvent> =
            events.iter().filter(|e| e.user_id == user_id).collect();
        Ok(UsageSummary {
            total_executions: for_user.len() as i64,
            last_used: for_user.iter().map(|e| e.timestamp).max(),
        })
    }
}
