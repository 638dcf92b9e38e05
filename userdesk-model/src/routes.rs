//! Route templates for the users endpoint, relative to the API root.

/// Collection route: list (GET) and create (POST).
pub const USERS: &str = "users/";

/// Item route: partial update (PATCH).
pub const USER_ITEM: &str = "users/{id}/";

/// Profile of the account the session belongs to.
pub const CURRENT_USER: &str = "users/me/";

/// Helper utilities for working with route templates
pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }
}

/// Path of a single user item.
pub fn user_item(id: &crate::UserId) -> String {
    utils::replace_param(USER_ITEM, "{id}", id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;

    #[test]
    fn user_item_substitutes_id() {
        assert_eq!(user_item(&UserId::Number(12)), "users/12/");
        assert_eq!(user_item(&UserId::from("abc")), "users/abc/");
    }
}
