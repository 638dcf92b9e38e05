//! userdesk UI library
//!
//! The user change component and everything it needs to run headless:
//! the Elm-style update/task loop, the HTTP client and service adapters,
//! and in-memory stubs. The `userdesk` binary drives it from a terminal.
//!
//! Notes
//! - Public items are subject to change while the component stabilises.
//! - The library is exposed mainly to enable testing and internal reuse.

pub mod app;
pub mod common;
pub mod domains;
pub mod infra;
pub mod runtime;
