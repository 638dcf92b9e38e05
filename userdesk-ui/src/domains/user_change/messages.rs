//! User change messages

use userdesk_model::{User, UserId};

/// Messages for the user change component
#[derive(Debug, Clone)]
pub enum Message {
    // Lifecycle
    /// Component attached; waits on the session gate
    Mounted,
    /// Session gate resolved
    SessionReady,

    // User list
    /// Fetch the full user list
    LoadUsers,
    /// List fetch result
    UsersLoaded(Result<Vec<User>, String>),
    /// Flip list visibility
    ToggleUsers,
    /// Set list visibility
    SetShowUsers(bool),
    /// Local edit of a listed user's name (row input binding)
    EditUsername { id: UserId, username: String },

    // Create
    /// New-user draft input changed
    UsernameChanged(String),
    /// Submit the draft as a new user
    AddUser,
    /// Create result, carrying the submitted username
    UserAdded(Result<String, String>),

    // Rename
    /// Send the user's current username to the backend
    UpdateUser(User),
    /// Rename result for the submitted user
    UserUpdated {
        user: User,
        result: Result<(), String>,
    },
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mounted => "UserChange::Mounted",
            Self::SessionReady => "UserChange::SessionReady",
            Self::LoadUsers => "UserChange::LoadUsers",
            Self::UsersLoaded(_) => "UserChange::UsersLoaded",
            Self::ToggleUsers => "UserChange::ToggleUsers",
            Self::SetShowUsers(_) => "UserChange::SetShowUsers",
            Self::EditUsername { .. } => "UserChange::EditUsername",
            Self::UsernameChanged(_) => "UserChange::UsernameChanged",
            Self::AddUser => "UserChange::AddUser",
            Self::UserAdded(_) => "UserChange::UserAdded",
            Self::UpdateUser(_) => "UserChange::UpdateUser",
            Self::UserUpdated { .. } => "UserChange::UserUpdated",
        }
    }
}
