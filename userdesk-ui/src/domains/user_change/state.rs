//! User change state

use std::sync::Arc;

use userdesk_model::User;

use crate::infra::services::{
    NotificationService, SessionGate, UserAdminService,
};

/// Whether the list has been fetched at least once. Never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loaded,
}

/// State owned by one component instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChangeState {
    /// Listed users; rows may carry unsaved edits from the row binding
    pub users: Vec<User>,
    /// Users exactly as returned by the last successful fetch
    pub fetched: Vec<User>,
    /// Whether the list is shown
    pub show_users: bool,
    /// Draft for the next user to create
    pub username: String,
    pub load_state: LoadState,
}

impl UserChangeState {
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }
}

/// Collaborators injected at construction
#[derive(Clone)]
pub struct UserChangeServices {
    pub users: Arc<dyn UserAdminService>,
    pub notifier: Arc<dyn NotificationService>,
    pub session: Arc<dyn SessionGate>,
}

impl std::fmt::Debug for UserChangeServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChangeServices").finish_non_exhaustive()
    }
}
