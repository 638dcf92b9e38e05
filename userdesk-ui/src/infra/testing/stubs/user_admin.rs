use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};
use userdesk_model::{
    CreateUserRequest, CurrentUser, RenameUserRequest, User, UserId,
};

use crate::infra::services::user_management::UserAdminService;

/// In-memory users backend.
///
/// List responses can be held back and released one by one, in any order,
/// to exercise overlapping loads.
#[derive(Debug, Clone)]
pub struct StubUserAdminService {
    inner: Arc<Mutex<InnerUserState>>,
    list_called: Arc<Notify>,
}

#[derive(Debug)]
struct InnerUserState {
    users: Vec<User>,
    next_id: i64,
    current_user: Option<CurrentUser>,
    list_calls: usize,
    create_calls: usize,
    rename_calls: usize,
    current_user_calls: usize,
    created: Vec<String>,
    renamed: Vec<(UserId, String)>,
    hold_lists: bool,
    held_lists: Vec<Option<oneshot::Sender<()>>>,
    failure: Option<String>,
}

impl Default for StubUserAdminService {
    fn default() -> Self {
        Self::new()
    }
}

impl StubUserAdminService {
    pub fn new() -> Self {
        let inner = InnerUserState {
            users: Vec::new(),
            next_id: 1,
            current_user: Some(CurrentUser {
                id: Some(UserId::Number(0)),
                email: "operator@example.org".into(),
                first_name: "Demo".into(),
                last_name: "Operator".into(),
                ..Default::default()
            }),
            list_calls: 0,
            create_calls: 0,
            rename_calls: 0,
            current_user_calls: 0,
            created: Vec::new(),
            renamed: Vec::new(),
            hold_lists: false,
            held_lists: Vec::new(),
            failure: None,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            list_called: Arc::new(Notify::new()),
        }
    }

    /// Seed the backend; new ids continue after the largest numeric id.
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.set_users(users);
        self
    }

    /// Hold every list response until released with [`Self::release_list`].
    pub fn hold_list_responses(self) -> Self {
        self.inner.lock().hold_lists = true;
        self
    }

    /// Answer current-user queries with 401-style failures.
    pub fn anonymous(self) -> Self {
        self.inner.lock().current_user = None;
        self
    }

    pub fn set_users(&self, users: Vec<User>) {
        let mut guard = self.inner.lock();
        guard.next_id = users
            .iter()
            .filter_map(|u| u.id.as_number())
            .max()
            .map_or(1, |max| max + 1);
        guard.users = users;
    }

    /// Make every subsequent call fail with `message`; `None` heals.
    pub fn set_failure(&self, message: Option<&str>) {
        self.inner.lock().failure = message.map(str::to_string);
    }

    pub fn users(&self) -> Vec<User> {
        self.inner.lock().users.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.lock().list_calls
    }

    pub fn create_calls(&self) -> usize {
        self.inner.lock().create_calls
    }

    pub fn rename_calls(&self) -> usize {
        self.inner.lock().rename_calls
    }

    pub fn current_user_calls(&self) -> usize {
        self.inner.lock().current_user_calls
    }

    /// Usernames sent to create, in call order.
    pub fn created(&self) -> Vec<String> {
        self.inner.lock().created.clone()
    }

    /// Rename requests received, in call order.
    pub fn renamed(&self) -> Vec<(UserId, String)> {
        self.inner.lock().renamed.clone()
    }

    /// Let the `index`-th held list call (0-based, by arrival) respond.
    /// Returns false when there is no such call or it was released already.
    pub fn release_list(&self, index: usize) -> bool {
        let sender = self
            .inner
            .lock()
            .held_lists
            .get_mut(index)
            .and_then(Option::take);
        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Wait until at least `count` list calls have reached the stub.
    pub async fn wait_for_list_calls(&self, count: usize) {
        loop {
            let notified = self.list_called.notified();
            if self.list_calls() >= count {
                return;
            }
            notified.await;
        }
    }

    fn check_failure(guard: &InnerUserState) -> Result<()> {
        match &guard.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserAdminService for StubUserAdminService {
    async fn list_users(&self) -> Result<Vec<User>> {
        let (snapshot, held) = {
            let mut guard = self.inner.lock();
            guard.list_calls += 1;
            let snapshot =
                Self::check_failure(&guard).map(|_| guard.users.clone());
            let held = if guard.hold_lists {
                let (tx, rx) = oneshot::channel();
                guard.held_lists.push(Some(tx));
                Some(rx)
            } else {
                None
            };
            (snapshot, held)
        };
        self.list_called.notify_waiters();

        if let Some(rx) = held {
            // A dropped sender releases the call as well.
            let _ = rx.await;
        }
        snapshot
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<()> {
        let mut guard = self.inner.lock();
        guard.create_calls += 1;
        Self::check_failure(&guard)?;

        let id = guard.next_id;
        guard.next_id += 1;
        guard.users.push(User::new(id, req.username.clone()));
        guard.created.push(req.username);
        Ok(())
    }

    async fn rename_user(
        &self,
        user_id: &UserId,
        req: RenameUserRequest,
    ) -> Result<()> {
        let mut guard = self.inner.lock();
        guard.rename_calls += 1;
        Self::check_failure(&guard)?;

        let Some(user) = guard.users.iter_mut().find(|u| u.id.matches(user_id))
        else {
            return Err(anyhow!("user {} not found", user_id));
        };
        user.username = req.username.clone();
        guard.renamed.push((user_id.clone(), req.username));
        Ok(())
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        let mut guard = self.inner.lock();
        guard.current_user_calls += 1;
        Self::check_failure(&guard)?;
        guard
            .current_user
            .clone()
            .ok_or_else(|| {
                anyhow!("Authentication credentials were not provided.")
            })
    }
}
