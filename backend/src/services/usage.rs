//! Usage reporting and dashboard statistics.

use serde_json::Value;
use thiserror::Error;

use crate::models::usage_event::{StatsResponse, UsageEvent};
use crate::repositories::{SessionKeyStore, StoreError, UsageStore};

#[derive(Debug, Error)]
pub enum ReportError {
    /// The presented key does not exist or is deactivated. The two cases
    /// are deliberately indistinguishable to the reporter.
    #[error("invalid or inactive session key")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Records one usage event against the owner of an active session key.
pub async fn record_usage(
    keys: &dyn SessionKeyStore,
    usage: &dyn UsageStore,
    session_key: &str,
    event_type: &str,
    metadata: Option<Value>,
) -> Result<(), ReportError> {
    let key = keys
        .find_active_by_value(session_key)
        .await?
        .ok_or(ReportError::NotFound)?;

    let event = UsageEvent::new(key.user_id, event_type.to_string(), metadata);
    usage.append(&event).await?;
    Ok(())
}

/// Builds the dashboard statistics for a user: execution totals from the
/// usage log plus active/locked counts over their keys.
pub async fn stats_for_user(
    keys: &dyn SessionKeyStore,
    usage: &dyn UsageStore,
    user_id: &str,
) -> Result<StatsResponse, StoreError> {
    let user_keys = keys.list_for_user(user_id).await?;
    let summary = usage.summary_for_user(user_id).await?;

    Ok(StatsResponse {
        total_executions: summary.total_executions,
        active_keys: user_keys.iter().filter(|k| k.is_active).count() as i64,
        locked_keys: user_keys.iter().filter(|k| k.hwid.is_some()).count() as i64,
        last_used: summary.last_used,
    })
}
