//! Models for the append-only usage log and its reporting payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One immutable log entry recorded by the licensed client. Rows are only
/// ever inserted and aggregated; nothing updates or deletes them.
pub struct UsageEvent {
    pub user_id: String,
    pub event_type: String,
    pub metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl UsageEvent {
    pub fn new(user_id: String, event_type: String, metadata: Option<Value>) -> Self {
        Self {
            user_id,
            event_type,
            metadata,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Report payload sent by the licensed client.
pub struct ReportRequest {
    // Absent fields default to empty so validation rejects them with the
    // contract 400 rather than a deserialization error.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing sessionKey or eventType."))]
    pub session_key: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing sessionKey or eventType."))]
    pub event_type: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub success: bool,
}

/// Aggregate counters over a user's usage log.
#[derive(Debug, Clone, FromRow)]
pub struct UsageSummary {
    pub total_executions: i64,
    pub last_used: Option<DateTime<Utc>>,
}

/// Dashboard statistics combining the usage log and key state.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total_executions: i64,
    pub active_keys: i64,
    pub locked_keys: i64,
    pub last_used: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn report_request_metadata_is_optional() {
        let request: ReportRequest = serde_json::from_value(serde_json::json!({
            "sessionKey": "abc",
            "eventType": "execution"
        }))
        .expect("deserialize");
        assert!(request.metadata.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn report_request_defaults_absent_fields_to_empty() {
        let request: ReportRequest =
            serde_json::from_value(serde_json::json!({ "sessionKey": "abc" }))
                .expect("deserialize");
        assert!(request.event_type.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn report_request_rejects_empty_event_type() {
        let request = ReportRequest {
            session_key: "abc".into(),
            event_type: String::new(),
            metadata: None,
        };
        assert!(request.validate().is_err());
    }
}
