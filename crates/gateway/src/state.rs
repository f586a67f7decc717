//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::UserServiceApi;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_client: Arc<dyn UserServiceApi>,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_client: Arc<dyn UserServiceApi>) -> Self {
        Self { user_client }
    }
}
