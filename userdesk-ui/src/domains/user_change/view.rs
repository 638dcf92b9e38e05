//! Pure render of the user change state.

use std::fmt;

use userdesk_model::UserId;

use super::state::UserChangeState;

/// Name of the template this component binds to.
pub const TEMPLATE_NAME: &str = "user-change-template";

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
}

/// Everything a presenter needs to draw the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChangeView {
    pub template: &'static str,
    pub show_users: bool,
    pub loaded: bool,
    pub user_count: usize,
    /// Empty while the list is hidden.
    pub rows: Vec<UserRow>,
    /// Value of the new-user input.
    pub username_input: String,
}

pub fn view(state: &UserChangeState) -> UserChangeView {
    let rows = if state.show_users {
        state
            .users
            .iter()
            .map(|u| UserRow {
                id: u.id.clone(),
                username: u.username.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    UserChangeView {
        template: TEMPLATE_NAME,
        show_users: state.show_users,
        loaded: state.is_loaded(),
        user_count: state.users.len(),
        rows,
        username_input: state.username.clone(),
    }
}

impl fmt::Display for UserChangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.loaded {
            writeln!(f, "Users: loading...")?;
        } else if self.show_users {
            writeln!(f, "Users ({}):", self.user_count)?;
            for row in &self.rows {
                writeln!(f, "  [{}] {}", row.id, row.username)?;
            }
        } else {
            writeln!(f, "Users: {} hidden (type `show`)", self.user_count)?;
        }
        write!(f, "New user: {}", self.username_input)
    }
}
