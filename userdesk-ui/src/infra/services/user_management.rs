use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use userdesk_model::{
    CreateUserRequest, CurrentUser, RenameUserRequest, User, UserId, routes,
};

use crate::infra::api_client::ApiClient;

#[async_trait]
pub trait UserAdminService: Send + Sync {
    /// List every user, in backend order
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Create a user with the given username
    async fn create_user(&self, req: CreateUserRequest) -> Result<()>;

    /// Change the username of an existing user
    async fn rename_user(
        &self,
        user_id: &UserId,
        req: RenameUserRequest,
    ) -> Result<()>;

    /// Profile of the account the session belongs to
    async fn current_user(&self) -> Result<CurrentUser>;
}

#[derive(Debug, Clone)]
pub struct UserAdminApiAdapter {
    client: Arc<ApiClient>,
}

impl UserAdminApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserAdminService for UserAdminApiAdapter {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.client.get(routes::USERS).await?)
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<()> {
        Ok(self.client.post(routes::USERS, &req).await?)
    }

    async fn rename_user(
        &self,
        user_id: &UserId,
        req: RenameUserRequest,
    ) -> Result<()> {
        let path = routes::user_item(user_id);
        Ok(self.client.patch(&path, &req).await?)
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        Ok(self.client.get(routes::CURRENT_USER).await?)
    }
}
