//! User change component
//!
//! Lists users, lets an operator rename one, and creates new ones:
//! - List: fetched after the session gate opens and after every create
//! - Rename: sends the username only, confirms with a notification
//! - Create: posts the draft, clears it, reloads the list
//!
//! Note: the list is always replaced wholesale by the latest response to
//! arrive; overlapping loads are neither cancelled nor ordered.

pub mod messages;
pub mod state;
pub mod update;
pub mod view;

pub use messages::Message;
pub use state::{LoadState, UserChangeServices, UserChangeState};
pub use view::{TEMPLATE_NAME, UserChangeView, UserRow};

use crate::common::Task;

/// A component instance: its state plus injected collaborators
#[derive(Debug)]
pub struct UserChange {
    state: UserChangeState,
    services: UserChangeServices,
}

impl UserChange {
    pub fn new(services: UserChangeServices) -> Self {
        Self {
            state: UserChangeState::default(),
            services,
        }
    }

    pub fn state(&self) -> &UserChangeState {
        &self.state
    }

    pub fn services(&self) -> &UserChangeServices {
        &self.services
    }

    /// Apply one message, returning follow-up work
    pub fn update(&mut self, message: Message) -> Task<Message> {
        update::handle_message(&mut self.state, &self.services, message)
    }

    pub fn view(&self) -> UserChangeView {
        view::view(&self.state)
    }
}
