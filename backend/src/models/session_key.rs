//! Models for issued session keys and the claim/listing payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a user's issued session key.
///
/// A key moves through `unbound -> bound` exactly once: `hwid` starts out
/// `NULL` and is fixed by the first successful claim. `is_active` is an
/// orthogonal administrative flag; a deactivated key rejects claims and
/// usage reports regardless of its binding state.
pub struct SessionKey {
    /// Unique identifier for the key row.
    pub id: String,
    /// Owning user. Internal linkage only; never serialized to clients.
    #[serde(skip_serializing)]
    pub user_id: String,
    /// The 36-hex-character key value presented by the licensed client.
    pub session_key: String,
    /// Hardware identifier the key is locked to, once claimed.
    pub hwid: Option<String>,
    /// Administrative kill switch.
    pub is_active: bool,
    /// Issuance timestamp.
    pub created_at: DateTime<Utc>,
}

impl SessionKey {
    /// Constructs a fresh, unbound, active key for a user.
    pub fn new(user_id: String, session_key: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            session_key,
            hwid: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Returns `true` once the key has been locked to a machine.
    pub fn is_bound(&self) -> bool {
        self.hwid.is_some()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Claim payload sent by the licensed client on every startup.
pub struct ClaimRequest {
    // Absent fields default to empty so validation rejects them with the
    // contract 400 rather than a deserialization error.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing sessionKey or hwid."))]
    pub session_key: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing sessionKey or hwid."))]
    pub hwid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Outcome of a claim; `message` distinguishes the first bind from an
/// idempotent re-validation.
pub struct ClaimResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// The one-time plaintext returned by key generation.
pub struct GenerateKeyResponse {
    pub session_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// A user's keys as shown on the dashboard.
pub struct KeyListResponse {
    pub keys: Vec<SessionKey>,
}

/// Per-key roll-up shown in the admin user detail view.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct KeyDetail {
    pub session_key: String,
    pub hwid: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub execution_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// The admin panel's per-user key breakdown.
pub struct KeyDetailListResponse {
    pub keys: Vec<KeyDetail>,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Admin toggle for a key's active flag.
pub struct SetKeyActiveRequest {
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetKeyActiveResponse {
    pub success: bool,
}
