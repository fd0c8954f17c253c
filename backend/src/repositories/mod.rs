//! Store traits and their implementations.
//!
//! Handlers and services only ever see the traits; `main` wires up the
//! Postgres implementations while tests substitute `MemoryStore` (or
//! mockall mocks) without touching a database.

pub mod memory;
pub mod session_keys;
pub mod usage_events;
pub mod users;

pub use memory::MemoryStore;
pub use session_keys::{PgSessionKeyStore, SessionKeyStore};
pub use usage_events::{PgUsageStore, UsageStore};
pub use users::{PgUserStore, UserStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule at the storage layer rejected the write.
    #[error("conflicting record")]
    Conflict,
    #[error("database error")]
    Database(#[from] sqlx::Error),
}
