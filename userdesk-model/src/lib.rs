//! Core data model definitions shared across userdesk crates.
#![allow(missing_docs)]

#[cfg(feature = "chrono")]
pub use ::chrono;

pub mod api;
pub mod ids;
pub mod routes;
pub mod user;

pub use api::{ApiResponse, CreateUserRequest, RenameUserRequest};
pub use ids::UserId;
pub use user::{CurrentUser, Timestamp, User};
