//! Event loop hosting one [`UserChange`] component.
//!
//! The loop is the only code that touches component state. Messages are
//! applied one at a time in the order they arrive; work returned by `update`
//! is spawned and its result queued back as another message. Two overlapping
//! list loads therefore settle in completion order, not issue order.

use log::{debug, trace};
use tokio::sync::mpsc;

use crate::common::task::{Action, Task};
use crate::domains::user_change::{
    Message, UserChange, UserChangeState, UserChangeView,
};

/// Render callback invoked with a fresh view after each state change.
pub type Observer = Box<dyn FnMut(&UserChangeView) + Send>;

enum Envelope {
    /// Dispatched from outside or yielded immediately by a task.
    Message(Message),
    /// Result of a spawned task.
    Completed(Message),
    Shutdown,
}

/// Cloneable sender for feeding input into a running [`Runtime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    sender: mpsc::UnboundedSender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(m) => write!(f, "Message({})", m.name()),
            Self::Completed(m) => write!(f, "Completed({})", m.name()),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl RuntimeHandle {
    /// Queue a message. Returns false once the runtime is gone.
    pub fn dispatch(&self, message: Message) -> bool {
        self.sender.send(Envelope::Message(message)).is_ok()
    }

    /// Ask [`Runtime::run`] to return after the messages queued before this.
    pub fn shutdown(&self) {
        let _ = self.sender.send(Envelope::Shutdown);
    }
}

pub struct Runtime {
    component: UserChange,
    sender: mpsc::UnboundedSender<Envelope>,
    receiver: mpsc::UnboundedReceiver<Envelope>,
    in_flight: usize,
    observers: Vec<Observer>,
    shut_down: bool,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("state", self.component.state())
            .field("in_flight", &self.in_flight)
            .field("observers", &self.observers.len())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl Runtime {
    pub fn new(component: UserChange) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            component,
            sender,
            receiver,
            in_flight: 0,
            observers: Vec::new(),
            shut_down: false,
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            sender: self.sender.clone(),
        }
    }

    /// Queue the lifecycle hook.
    pub fn mount(&self) {
        self.dispatch(Message::Mounted);
    }

    pub fn dispatch(&self, message: Message) {
        // The runtime owns a receiver, so this cannot fail.
        let _ = self.sender.send(Envelope::Message(message));
    }

    /// Register a render observer.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&UserChangeView) + Send + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    /// Spawned tasks whose result has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn state(&self) -> &UserChangeState {
        self.component.state()
    }

    pub fn view(&self) -> UserChangeView {
        self.component.view()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Wait for and apply the next queued message.
    ///
    /// Returns false once shut down; later calls return false immediately.
    pub async fn step(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        match self.receiver.recv().await {
            Some(envelope) => self.process(envelope),
            None => false,
        }
    }

    /// Apply messages until nothing is queued and nothing is in flight.
    ///
    /// Never returns while a spawned task is pending, including a session
    /// gate that does not open.
    pub async fn run_until_idle(&mut self) {
        while !self.shut_down {
            match self.receiver.try_recv() {
                Ok(envelope) => {
                    self.process(envelope);
                }
                Err(mpsc::error::TryRecvError::Empty)
                    if self.in_flight == 0 =>
                {
                    break;
                }
                Err(mpsc::error::TryRecvError::Empty) => {
                    if !self.step().await {
                        break;
                    }
                }
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Apply messages until [`RuntimeHandle::shutdown`] is received.
    pub async fn run(&mut self) {
        while self.step().await {}
    }

    fn process(&mut self, envelope: Envelope) -> bool {
        trace!("[Runtime] {:?}", envelope);
        match envelope {
            Envelope::Message(message) => self.apply(message),
            Envelope::Completed(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.apply(message);
            }
            Envelope::Shutdown => {
                debug!("[Runtime] Shutting down");
                self.shut_down = true;
                return false;
            }
        }
        true
    }

    fn apply(&mut self, message: Message) {
        let before = self.component.state().clone();
        let task = self.component.update(message);
        if *self.component.state() != before {
            let view = self.component.view();
            for observer in &mut self.observers {
                observer(&view);
            }
        }
        self.schedule(task);
    }

    fn schedule(&mut self, task: Task<Message>) {
        for action in task.into_actions() {
            match action {
                Action::Done(message) => {
                    let _ = self.sender.send(Envelope::Message(message));
                }
                Action::Future(future) => {
                    self.in_flight += 1;
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        let message = future.await;
                        let _ = sender.send(Envelope::Completed(message));
                    });
                }
            }
        }
    }
}
