use std::sync::Arc;

use anyhow::Result;

use crate::domains::user_change::{UserChange, UserChangeServices};
use crate::infra::services::{
    CurrentUserGate, NotificationService, UserAdminApiAdapter,
    UserAdminService,
};
use crate::infra::testing::stubs::StubUserAdminService;
use crate::runtime::Runtime;

pub mod bootstrap;
pub mod commands;

pub use bootstrap::AppConfig;

/// Everything wired together for one running component.
#[derive(Debug)]
pub struct App {
    pub runtime: Runtime,
    pub session: Arc<CurrentUserGate>,
}

/// Pick the users backend: the real API, or the in-memory stub.
pub async fn user_admin_service(
    config: &AppConfig,
) -> Result<Arc<dyn UserAdminService>> {
    if config.use_test_stubs() {
        log::warn!("Using in-memory stub users backend");
        let stub = StubUserAdminService::new()
            .with_users(vec![userdesk_model::User::new(1, "admin")]);
        return Ok(Arc::new(stub));
    }
    let client = Arc::new(config.build_client().await?);
    Ok(Arc::new(UserAdminApiAdapter::new(client)))
}

/// Build the component and its runtime. The session gate is the
/// current-user query against the same backend.
pub async fn build(
    config: &AppConfig,
    notifier: Arc<dyn NotificationService>,
) -> Result<App> {
    let users = user_admin_service(config).await?;
    let session = Arc::new(CurrentUserGate::new(users.clone()));
    let services = UserChangeServices {
        users,
        notifier,
        session: session.clone(),
    };
    Ok(App {
        runtime: Runtime::new(UserChange::new(services)),
        session,
    })
}
