//! Readiness gates that must open before user data may be queried.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::{OnceCell, watch};
use userdesk_model::CurrentUser;

use crate::infra::services::user_management::UserAdminService;

#[async_trait]
pub trait SessionGate: Send + Sync {
    /// Resolves once it is safe to query users. Never times out.
    async fn wait_until_user_query_done(&self);
}

/// Gate opened by hand through its paired [`SessionReadiness`].
#[derive(Debug, Clone)]
pub struct WatchSessionGate {
    ready: watch::Receiver<bool>,
}

/// Opening side of a [`WatchSessionGate`].
#[derive(Debug, Clone)]
pub struct SessionReadiness {
    ready: Arc<watch::Sender<bool>>,
}

impl SessionReadiness {
    /// Create a closed gate and the handle that opens it.
    pub fn new() -> (Self, WatchSessionGate) {
        let (tx, rx) = watch::channel(false);
        (Self { ready: Arc::new(tx) }, WatchSessionGate { ready: rx })
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }
}

#[async_trait]
impl SessionGate for WatchSessionGate {
    async fn wait_until_user_query_done(&self) {
        let mut ready = self.ready.clone();
        // A dropped sender can never open the gate; keep waiting forever.
        let opened = ready.wait_for(|open| *open).await.map(|_| ());
        if opened.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Gate that opens once the current-user query has finished.
///
/// The query runs at most once no matter how many callers wait. Failure
/// still counts as finished: an anonymous session simply has no profile.
pub struct CurrentUserGate {
    service: Arc<dyn UserAdminService>,
    current: OnceCell<Option<CurrentUser>>,
}

impl std::fmt::Debug for CurrentUserGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUserGate")
            .field("current", &self.current.get())
            .finish()
    }
}

impl CurrentUserGate {
    pub fn new(service: Arc<dyn UserAdminService>) -> Self {
        Self {
            service,
            current: OnceCell::new(),
        }
    }

    /// The resolved profile, if the query has finished and succeeded.
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current.get().and_then(Option::as_ref)
    }

    pub fn is_done(&self) -> bool {
        self.current.initialized()
    }
}

#[async_trait]
impl SessionGate for CurrentUserGate {
    async fn wait_until_user_query_done(&self) {
        self.current
            .get_or_init(|| async {
                match self.service.current_user().await {
                    Ok(user) => {
                        info!(
                            "[Session] Signed in as {}",
                            user.display_name()
                        );
                        Some(user)
                    }
                    Err(e) => {
                        warn!("[Session] Current user query failed: {}", e);
                        None
                    }
                }
            })
            .await;
    }
}
