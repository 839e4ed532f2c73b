//! # Session Context
//!
//! Explicit session state: who is signed in at this terminal.
//!
//! This is deliberately **not** a process-wide singleton. A [`Session`] is an
//! owned value the application wires into whatever component needs identity,
//! and change notification is explicit observer registration scoped to the
//! consuming component's lifetime: subscribe when the component starts,
//! unsubscribe when it goes away.

use crate::types::User;

/// Handle returned by [`Session::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeListener = Box<dyn Fn(Option<&User>) + Send>;

/// Current signed-in user plus registered change observers.
pub struct Session {
    current_user: Option<User>,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
}

impl Session {
    /// Creates an empty session (nobody signed in).
    pub fn new() -> Self {
        Session {
            current_user: None,
            next_subscription: 0,
            listeners: Vec::new(),
        }
    }

    /// The currently signed-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether the signed-in user has administrator rights. False when
    /// nobody is signed in.
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().map_or(false, |u| u.is_admin)
    }

    /// Signs a user in, replacing any previous user, and notifies observers.
    pub fn sign_in(&mut self, user: User) {
        self.current_user = Some(user);
        self.notify();
    }

    /// Signs the current user out and notifies observers.
    pub fn sign_out(&mut self) {
        if self.current_user.take().is_some() {
            self.notify();
        }
    }

    /// Registers an observer called on every sign-in/sign-out. Returns a
    /// handle the caller must keep to [`unsubscribe`](Session::unsubscribe)
    /// when its own lifetime ends.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&User>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes an observer. Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(self.current_user.as_ref());
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
