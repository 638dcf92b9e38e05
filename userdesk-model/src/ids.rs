use std::fmt;

/// Opaque identifier assigned to a user by the backend.
///
/// The backend is free to hand out integers or strings; both are kept
/// verbatim and rendered back unchanged when building item paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether both ids name the same user, however the backend encoded
    /// them: `Number(7)` matches `Text("7")` but not `Text("07")`.
    pub fn matches(&self, other: &UserId) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(t))
            | (Self::Text(t), Self::Number(n)) => *t == n.to_string(),
        }
    }

    /// Parse operator input: digits become a numeric id, anything else text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(trimmed.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_numbers() {
        assert_eq!(UserId::parse(" 42 "), UserId::Number(42));
        assert_eq!(UserId::parse("abc-1"), UserId::Text("abc-1".into()));
    }

    #[test]
    fn matches_across_encodings() {
        assert!(UserId::parse("7").matches(&UserId::from("7")));
        assert!(UserId::from("7").matches(&UserId::Number(7)));
        assert!(!UserId::from("07").matches(&UserId::Number(7)));
        assert!(!UserId::from("u-7").matches(&UserId::from("u-8")));
    }

    #[test]
    fn display_is_verbatim() {
        assert_eq!(UserId::from(7).to_string(), "7");
        assert_eq!(UserId::from("u-7").to_string(), "u-7");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let ids: Vec<UserId> =
            serde_json::from_str(r#"[1, "2a"]"#).expect("valid ids");
        assert_eq!(ids, vec![UserId::Number(1), UserId::Text("2a".into())]);
        assert_eq!(
            serde_json::to_string(&UserId::Number(3)).expect("serialize"),
            "3"
        );
    }
}
