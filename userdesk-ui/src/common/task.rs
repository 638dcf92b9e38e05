//! Deferred work returned from update handlers.
//!
//! A [`Task`] is a bag of futures, each producing one message that the
//! runtime feeds back into `update`. Handlers never await anything
//! themselves; they describe the work and let the runtime drive it.

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

pub(crate) enum Action<M> {
    /// Message available immediately, queued without spawning.
    Done(M),
    /// Message produced once the future resolves.
    Future(BoxFuture<'static, M>),
}

/// Work to run after an update, yielding follow-up messages.
#[must_use = "a Task does nothing unless handed to the runtime"]
pub struct Task<M> {
    actions: Vec<Action<M>>,
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("units", &self.units()).finish()
    }
}

impl<M: Send + 'static> Task<M> {
    /// A task that does nothing.
    pub fn none() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// A task that yields `message` right away.
    pub fn done(message: M) -> Self {
        Self {
            actions: vec![Action::Done(message)],
        }
    }

    /// Run `future` and map its output into a message.
    pub fn perform<T, F>(
        future: F,
        map: impl FnOnce(T) -> M + Send + 'static,
    ) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: 'static,
    {
        Self {
            actions: vec![Action::Future(future.map(map).boxed())],
        }
    }

    /// Combine several tasks; their units run independently.
    pub fn batch(tasks: impl IntoIterator<Item = Self>) -> Self {
        Self {
            actions: tasks.into_iter().flat_map(|t| t.actions).collect(),
        }
    }

    /// Convert every produced message with `f`.
    pub fn map<N: Send + 'static>(
        self,
        f: impl Fn(M) -> N + Clone + Send + 'static,
    ) -> Task<N> {
        let actions = self
            .actions
            .into_iter()
            .map(|action| match action {
                Action::Done(message) => Action::Done(f(message)),
                Action::Future(future) => {
                    let f = f.clone();
                    Action::Future(future.map(f).boxed())
                }
            })
            .collect();
        Task { actions }
    }

    pub(crate) fn into_actions(self) -> Vec<Action<M>> {
        self.actions
    }
}

impl<M> Task<M> {
    /// Number of independent units (immediate messages plus futures).
    pub fn units(&self) -> usize {
        self.actions.len()
    }

    pub fn is_none(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<M: Send + 'static> Default for Task<M> {
    fn default() -> Self {
        Self::none()
    }
}
