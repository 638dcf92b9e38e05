//! User change update handlers

use log::{debug, error, info};
use userdesk_model::{CreateUserRequest, RenameUserRequest, User, UserId};

use super::messages::Message;
use super::state::{LoadState, UserChangeServices, UserChangeState};
use crate::common::Task;
use crate::infra::services::Severity;

/// Confirmation shown after a successful rename.
pub fn rename_confirmation(username: &str) -> String {
    format!(
        "You can't imagine the joy of {} once they find out!",
        username
    )
}

/// Main message handler for the user change component
pub fn handle_message(
    state: &mut UserChangeState,
    services: &UserChangeServices,
    message: Message,
) -> Task<Message> {
    debug!("User change update: {}", message.name());

    match message {
        // Lifecycle
        Message::Mounted => handle_mounted(services),
        Message::SessionReady => handle_load_users(services),

        // User list
        Message::LoadUsers => handle_load_users(services),
        Message::UsersLoaded(result) => {
            handle_users_loaded(state, services, result)
        }
        Message::ToggleUsers => {
            state.show_users = !state.show_users;
            Task::none()
        }
        Message::SetShowUsers(show) => {
            state.show_users = show;
            Task::none()
        }
        Message::EditUsername { id, username } => {
            handle_edit_username(state, id, username)
        }

        // Create
        Message::UsernameChanged(value) => {
            state.username = value;
            Task::none()
        }
        Message::AddUser => handle_add_user(state, services),
        Message::UserAdded(result) => {
            handle_user_added(state, services, result)
        }

        // Rename
        Message::UpdateUser(user) => handle_update_user(services, user),
        Message::UserUpdated { user, result } => {
            handle_user_updated(state, services, user, result)
        }
    }
}

fn handle_mounted(services: &UserChangeServices) -> Task<Message> {
    info!("User change mounted, waiting for session");
    let session = services.session.clone();
    Task::perform(
        async move { session.wait_until_user_query_done().await },
        |_| Message::SessionReady,
    )
}

fn handle_load_users(services: &UserChangeServices) -> Task<Message> {
    let service = services.users.clone();
    Task::perform(
        async move { service.list_users().await.map_err(|e| e.to_string()) },
        Message::UsersLoaded,
    )
}

fn handle_users_loaded(
    state: &mut UserChangeState,
    services: &UserChangeServices,
    result: Result<Vec<User>, String>,
) -> Task<Message> {
    match result {
        Ok(users) => {
            info!("Successfully loaded {} users", users.len());
            state.fetched = users.clone();
            state.users = users;
            state.load_state = LoadState::Loaded;
        }
        Err(e) => {
            error!("Failed to load users: {}", e);
            services.notifier.display_message(
                &format!("Could not load users: {}", e),
                Severity::Error,
            );
        }
    }
    Task::none()
}

fn handle_edit_username(
    state: &mut UserChangeState,
    id: UserId,
    username: String,
) -> Task<Message> {
    match state.users.iter_mut().find(|u| u.id.matches(&id)) {
        Some(user) => user.username = username,
        None => debug!("Ignoring edit for unlisted user {}", id),
    }
    Task::none()
}

fn handle_add_user(
    state: &UserChangeState,
    services: &UserChangeServices,
) -> Task<Message> {
    let username = state.username.clone();
    info!("Creating user '{}'", username);
    let service = services.users.clone();
    Task::perform(
        async move {
            service
                .create_user(CreateUserRequest {
                    username: username.clone(),
                })
                .await
                .map(|_| username)
                .map_err(|e| e.to_string())
        },
        Message::UserAdded,
    )
}

fn handle_user_added(
    state: &mut UserChangeState,
    services: &UserChangeServices,
    result: Result<String, String>,
) -> Task<Message> {
    match result {
        Ok(username) => {
            info!("User '{}' created, reloading list", username);
            state.username.clear();
            Task::done(Message::LoadUsers)
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            services.notifier.display_message(
                &format!("Could not add user: {}", e),
                Severity::Error,
            );
            Task::none()
        }
    }
}

fn handle_update_user(
    services: &UserChangeServices,
    user: User,
) -> Task<Message> {
    info!("Renaming user {} to '{}'", user.id, user.username);
    let service = services.users.clone();
    Task::perform(
        async move {
            let req = RenameUserRequest {
                username: user.username.clone(),
            };
            let result = service
                .rename_user(&user.id, req)
                .await
                .map_err(|e| e.to_string());
            (user, result)
        },
        |(user, result)| Message::UserUpdated { user, result },
    )
}

fn handle_user_updated(
    state: &mut UserChangeState,
    services: &UserChangeServices,
    user: User,
    result: Result<(), String>,
) -> Task<Message> {
    match result {
        Ok(()) => {
            info!("User {} renamed to '{}'", user.id, user.username);
            services.notifier.display_message(
                &rename_confirmation(&user.username),
                Severity::Warning,
            );
        }
        Err(e) => {
            error!("Failed to rename user {}: {}", user.id, e);
            restore_fetched_username(state, &user.id);
            services.notifier.display_message(
                &format!("Could not rename user: {}", e),
                Severity::Error,
            );
        }
    }
    Task::none()
}

/// Put back the fetched name of a row whose rename was rejected.
fn restore_fetched_username(state: &mut UserChangeState, id: &UserId) {
    let Some(fetched) = state.fetched.iter().find(|u| u.id.matches(id)) else {
        return;
    };
    if let Some(row) = state.users.iter_mut().find(|u| u.id.matches(id)) {
        row.username.clone_from(&fetched.username);
    }
}
