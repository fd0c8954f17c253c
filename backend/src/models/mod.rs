//! Data models shared across database access and API handlers.

pub mod session_key;
pub mod usage_event;
pub mod user;
