//! Models for user accounts and the login/admin authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::rules::validate_login_key;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a user account. Users have no username or
/// password; identity is established solely by possession of the login key,
/// of which only the salted hash is stored.
pub struct User {
    /// Unique identifier for the user.
    pub id: String,
    /// Argon2 hash of the user's 52-character login key.
    pub login_key_hash: String,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Constructs a new user around an already-hashed login key.
    pub fn new(login_key_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            login_key_hash,
            created_at: Utc::now(),
        }
    }
}

/// Projection used by login verification: just enough to scan the stored
/// hashes without dragging whole user rows around.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredential {
    pub id: String,
    pub login_key_hash: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Login key submitted by a user attempting to authenticate.
pub struct LoginRequest {
    /// The 52-character secret issued out-of-band. Defaults to empty when
    /// absent so the length rule rejects it with the contract message
    /// instead of a deserialization error.
    #[serde(default)]
    #[validate(custom(function = "validate_login_key"))]
    pub login_key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Returned after a successful login alongside the auth cookie.
pub struct LoginResponse {
    pub success: bool,
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Password submitted for admin panel access.
pub struct AdminAuthRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Returned after a successful admin login alongside the admin cookie.
pub struct AdminAuthResponse {
    pub success: bool,
}

/// Per-user roll-up shown in the admin user list.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserOverview {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub key_count: i64,
    pub execution_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// The admin panel's user list.
pub struct UserListResponse {
    pub users: Vec<UserOverview>,
}
