//! Domain logic between the HTTP handlers and the stores.
//!
//! Each service function takes the store traits it needs, so handlers stay
//! thin and unit tests drive the logic with mocks.

pub mod key_lifecycle;
pub mod login;
pub mod usage;

pub use key_lifecycle::{claim_key, issue_key, ClaimError, ClaimOutcome, IssueError};
pub use login::{verify_login, LoginError};
pub use usage::{record_usage, stats_for_user, ReportError};
