//! Session key issuance and the claim/bind state machine.

use thiserror::Error;

use crate::models::session_key::SessionKey;
use crate::repositories::{SessionKeyStore, StoreError};
use crate::utils::keygen::generate_session_key;

#[derive(Debug, Error)]
pub enum IssueError {
    /// The user already holds a key. One key per user, forever.
    #[error("key already issued")]
    AlreadyIssued,
    #[error(transparent)]
    Store(StoreError),
}

#[derive(Debug, Error)]
pub enum ClaimError {
    /// No key row carries the presented value.
    #[error("unknown session key")]
    NotFound,
    /// The key exists but an admin has switched it off.
    #[error("key deactivated")]
    Deactivated,
    /// The key is locked to a different machine.
    #[error("hwid mismatch")]
    HwidMismatch,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a successful claim resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// First claim: the key was unbound and is now locked to this machine.
    BoundNow,
    /// The key was already locked to this machine; re-validation succeeded.
    AlreadyBound,
}

/// Issues a user's one and only session key, returning the plaintext.
///
/// The count check gives the friendly refusal on the common path; the
/// storage layer's uniqueness rule on `user_id` is what actually closes the
/// window where two concurrent requests both pass the check. A conflicting
/// insert therefore also maps to [`IssueError::AlreadyIssued`].
pub async fn issue_key(
    keys: &dyn SessionKeyStore,
    user_id: &str,
) -> Result<SessionKey, IssueError> {
    if keys.count_for_user(user_id).await.map_err(IssueError::Store)? > 0 {
        return Err(IssueError::AlreadyIssued);
    }

    let key = SessionKey::new(user_id.to_string(), generate_session_key());
    match keys.insert(&key).await {
        Ok(()) => Ok(key),
        Err(StoreError::Conflict) => Err(IssueError::AlreadyIssued),
        Err(e) => Err(IssueError::Store(e)),
    }
}

/// Runs the claim state machine for a presented key and machine id.
///
/// Deactivation is checked before binding state, so a deactivated key
/// reports as deactivated even to the machine it is bound to. Binding uses
/// a compare-and-swap that only succeeds while the key is unbound; losing
/// the swap means a concurrent claim bound the key first, and the state is
/// re-read once so the loser gets the same answer it would have gotten
/// arriving a moment later.
pub async fn claim_key(
    keys: &dyn SessionKeyStore,
    session_key: &str,
    hwid: &str,
) -> Result<ClaimOutcome, ClaimError> {
    let key = keys
        .find_by_value(session_key)
        .await?
        .ok_or(ClaimError::NotFound)?;

    match evaluate(&key, hwid)? {
        Some(outcome) => Ok(outcome),
        None => {
            if keys.bind_hwid(&key.id, hwid).await? {
                return Ok(ClaimOutcome::BoundNow);
            }
            // Lost the bind race; someone else got there first.
            let key = keys
                .find_by_value(session_key)
                .await?
                .ok_or(ClaimError::NotFound)?;
            match evaluate(&key, hwid)? {
                Some(outcome) => Ok(outcome),
                // Still unbound after a failed swap only happens if the row
                // vanished and came back; treat it as not found.
                None => Err(ClaimError::NotFound),
            }
        }
    }
}

/// Maps a key's current state against the presented machine id. `Ok(None)`
/// means the key is unbound and a bind should be attempted.
fn evaluate(key: &SessionKey, hwid: &str) -> Result<Option<ClaimOutcome>, ClaimError> {
    if !key.is_active {
        return Err(ClaimError::Deactivated);
    }
    match key.hwid.as_deref() {
        None => Ok(None),
        Some(bound) if bound == hwid => Ok(Some(ClaimOutcome::AlreadyBound)),
        Some(_) => Err(ClaimError::HwidMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::session_keys::MockSessionKeyStore;
    use mockall::predicate::eq;

    fn key(hwid: Option<&str>, is_active: bool) -> SessionKey {
        SessionKey {
            id: "key-1".into(),
            user_id: "user-1".into(),
            session_key: "abc".into(),
            hwid: hwid.map(Into::into),
            is_active,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn issue_refuses_second_key() {
        let mut store = MockSessionKeyStore::new();
        store
            .expect_count_for_user()
            .with(eq("user-1"))
            .returning(|_| Ok(1));

        let err = issue_key(&store, "user-1").await.unwrap_err();
        assert!(matches!(err, IssueError::AlreadyIssued));
    }

    #[tokio::test]
    async fn issue_returns_fresh_36_char_key() {
        let mut store = MockSessionKeyStore::new();
        store.expect_count_for_user().returning(|_| Ok(0));
        store.expect_insert().returning(|_| Ok(()));

        let key = issue_key(&store, "user-1").await.unwrap();
        assert_eq!(key.session_key.len(), 36);
        assert!(key.hwid.is_none());
        assert!(key.is_active);
    }

    #[tokio::test]
    async fn issue_maps_storage_conflict_to_already_issued() {
        let mut store = MockSessionKeyStore::new();
        store.expect_count_for_user().returning(|_| Ok(0));
        store
            .expect_insert()
            .returning(|_| Err(StoreError::Conflict));

        let err = issue_key(&store, "user-1").await.unwrap_err();
        assert!(matches!(err, IssueError::AlreadyIssued));
    }

    #[tokio::test]
    async fn first_claim_binds() {
        let mut store = MockSessionKeyStore::new();
        store
            .expect_find_by_value()
            .returning(|_| Ok(Some(key(None, true))));
        store
            .expect_bind_hwid()
            .with(eq("key-1"), eq("HW-A"))
            .returning(|_, _| Ok(true));

        let outcome = claim_key(&store, "abc", "HW-A").await.unwrap();
        assert_eq!(outcome, ClaimOutcome::BoundNow);
    }

    #[tokio::test]
    async fn repeat_claim_from_same_machine_succeeds() {
        let mut store = MockSessionKeyStore::new();
        store
            .expect_find_by_value()
            .returning(|_| Ok(Some(key(Some("HW-A"), true))));

        let outcome = claim_key(&store, "abc", "HW-A").await.unwrap();
        assert_eq!(outcome, ClaimOutcome::AlreadyBound);
    }

    #[tokio::test]
    async fn claim_from_other_machine_is_rejected() {
        let mut store = MockSessionKeyStore::new();
        store
            .expect_find_by_value()
            .returning(|_| Ok(Some(key(Some("HW-A"), true))));

        let err = claim_key(&store, "abc", "HW-B").await.unwrap_err();
        assert!(matches!(err, ClaimError::HwidMismatch));
    }

    #[tokio::test]
    async fn deactivated_key_rejects_even_its_own_machine() {
        let mut store = MockSessionKeyStore::new();
        store
            .expect_find_by_value()
            .returning(|_| Ok(Some(key(Some("HW-A"), false))));

        let err = claim_key(&store, "abc", "HW-A").await.unwrap_err();
        assert!(matches!(err, ClaimError::Deactivated));
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let mut store = MockSessionKeyStore::new();
        store.expect_find_by_value().returning(|_| Ok(None));

        let err = claim_key(&store, "abc", "HW-A").await.unwrap_err();
        assert!(matches!(err, ClaimError::NotFound));
    }

    #[tokio::test]
    async fn lost_bind_race_resolves_from_fresh_state() {
        let mut store = MockSessionKeyStore::new();
        let mut reads = 0;
        store.expect_find_by_value().returning(move |_| {
            reads += 1;
            if reads == 1 {
                Ok(Some(key(None, true)))
            } else {
                Ok(Some(key(Some("HW-B"), true)))
            }
        });
        store.expect_bind_hwid().returning(|_, _| Ok(false));

        let err = claim_key(&store, "abc", "HW-A").await.unwrap_err();
        assert!(matches!(err, ClaimError::HwidMismatch));
    }
}
