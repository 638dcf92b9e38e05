//! Service traits the component depends on, with their production adapters.

pub mod notifications;
pub mod session;
pub mod user_management;

pub use notifications::{
    LogNotifier, NotificationService, Severity, Toast, ToastQueue,
};
pub use session::{
    CurrentUserGate, SessionGate, SessionReadiness, WatchSessionGate,
};
pub use user_management::{UserAdminApiAdapter, UserAdminService};
