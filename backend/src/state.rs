use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{SessionKeyStore, UsageStore, UserStore};

/// Shared application state handed to every handler.
///
/// Stores are trait objects so `main` can wire the Postgres implementations
/// while tests substitute the in-memory store or mocks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub keys: Arc<dyn SessionKeyStore>,
    pub usage: Arc<dyn UsageStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        keys: Arc<dyn SessionKeyStore>,
        usage: Arc<dyn UsageStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            keys,
            usage,
        }
    }
}
