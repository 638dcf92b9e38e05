//! Wire shapes exchanged with the users endpoint.

/// Response body of a successful read.
///
/// Some deployments wrap payloads as `{ "data": ... }`, others return the
/// payload bare. Both decode to the same value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ApiResponse<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        match self {
            Self::Enveloped { data } => data,
            Self::Bare(data) => data,
        }
    }
}

/// Body of `POST users/`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateUserRequest {
    pub username: String,
}

/// Body of `PATCH users/{id}/`. Only the username is ever sent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenameUserRequest {
    pub username: String,
}
