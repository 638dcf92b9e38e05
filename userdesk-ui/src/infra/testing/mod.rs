//! Test doubles for running the component without a backend.

pub mod stubs;
