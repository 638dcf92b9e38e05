use crate::ids::UserId;

#[cfg(feature = "chrono")]
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Without chrono the backend timestamp is kept as its raw ISO-8601 text.
#[cfg(not(feature = "chrono"))]
pub type Timestamp = String;

/// A user as listed by the administration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Profile of the signed-in account, as returned by `users/me/`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CurrentUser {
    pub id: Option<UserId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub email_verified_at: Option<Timestamp>,
}

impl CurrentUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Full name when known, otherwise the email address.
    pub fn display_name(&self) -> String {
        let full = self.full_name();
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }

    /// Postal address, or an empty string unless every part is present.
    pub fn address(&self) -> String {
        if self.street.is_empty()
            || self.house_number.is_empty()
            || self.postal_code.is_empty()
            || self.city.is_empty()
        {
            return String::new();
        }
        format!(
            "{} {}, {} {}",
            self.street, self.house_number, self.postal_code, self.city
        )
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let mut me = CurrentUser {
            email: "ada@example.org".into(),
            ..Default::default()
        };
        assert_eq!(me.display_name(), "ada@example.org");

        me.first_name = "Ada".into();
        assert_eq!(me.display_name(), "Ada");

        me.last_name = "Lovelace".into();
        assert_eq!(me.display_name(), "Ada Lovelace");
    }

    #[test]
    fn address_requires_every_part() {
        let mut me = CurrentUser {
            street: "Hauptstraße".into(),
            house_number: "5".into(),
            postal_code: "10115".into(),
            ..Default::default()
        };
        assert_eq!(me.address(), "");

        me.city = "Berlin".into();
        assert_eq!(me.address(), "Hauptstraße 5, 10115 Berlin");
    }

    #[test]
    fn current_user_tolerates_partial_payloads() {
        let me: CurrentUser = serde_json::from_str(
            r#"{"id": 3, "email": "x@y.z",
                "email_verified_at": "2024-05-01T10:00:00Z"}"#,
        )
        .expect("partial profile decodes");
        assert_eq!(me.id, Some(UserId::Number(3)));
        assert!(me.is_email_verified());
        assert!(me.city.is_empty());
    }
}
