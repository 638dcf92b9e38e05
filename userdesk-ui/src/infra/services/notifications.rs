//! Operator-facing notifications.
//!
//! Components push short messages through [`NotificationService`] and move
//! on; nothing is returned and nothing is awaited.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// How a notification is styled. Carries no control-flow meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait NotificationService: Send + Sync {
    fn display_message(&self, text: &str, severity: Severity);
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// In-memory queue drained by whatever presents notifications.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.inner.lock().drain(..).collect()
    }

    /// Copy of the queue without consuming it.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl NotificationService for ToastQueue {
    fn display_message(&self, text: &str, severity: Severity) {
        self.inner.lock().push_back(Toast {
            text: text.to_string(),
            severity,
            created_at: Utc::now(),
        });
    }
}

/// Writes notifications to the log instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationService for LogNotifier {
    fn display_message(&self, text: &str, severity: Severity) {
        match severity {
            Severity::Error => log::error!("[Notify] {}", text),
            Severity::Warning => log::warn!("[Notify] {}", text),
            Severity::Info | Severity::Success => {
                log::info!("[Notify] {}", text)
            }
        }
    }
}
