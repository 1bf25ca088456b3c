//! Connection handles.

use std::fmt;
use std::sync::{Arc, Weak};

use super::ConnectionKey;
use crate::error::Result;
use crate::signal::Core;

/// Handle to a single listener registration.
///
/// Cloning a handle yields another handle to the same registration.
///
/// # Example
///
/// ```rust
/// use beacon_core::Signal;
///
/// let signal = Signal::<i32>::new();
/// let connection = signal.connect(|_| {}).unwrap();
///
/// connection.disconnect();
/// assert!(!connection.connected());
///
/// connection.reconnect().unwrap();
/// assert!(connection.connected());
/// ```
pub struct Connection<A> {
    core: Weak<Core<A>>,
    key: ConnectionKey,
    priority: i32,
    once: bool,
}

impl<A> Connection<A> {
    pub(crate) fn new(core: &Arc<Core<A>>, key: ConnectionKey, priority: i32, once: bool) -> Self {
        Self {
            core: Arc::downgrade(core),
            key,
            priority,
            once,
        }
    }

    /// The registration's key within its signal.
    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    /// Priority the registration was made with; 0 for plain signals.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether this registration disconnects itself when dispatched.
    pub fn is_once(&self) -> bool {
        self.once
    }

    /// Whether the registration is currently linked and will be dispatched.
    pub fn connected(&self) -> bool {
        self.core
            .upgrade()
            .is_some_and(|core| core.is_active(self.key))
    }

    /// Unlink the registration. Calling this more than once, or after the
    /// signal is gone, does nothing.
    pub fn disconnect(&self) {
        if let Some(core) = self.core.upgrade() {
            core.disconnect(self.key);
        }
    }

    /// Link a disconnected registration back in at its original priority.
    ///
    /// It joins the end of its priority bucket. Reconnecting a registration
    /// that is still connected is a no-op.
    ///
    /// # Errors
    ///
    /// [`SignalError::ReconnectInvalidState`](crate::SignalError::ReconnectInvalidState)
    /// if the signal was destroyed or dropped, or if the registration's slot
    /// has since been reused by another connection.
    pub fn reconnect(&self) -> Result<()> {
        match self.core.upgrade() {
            Some(core) => core.reconnect(self.key),
            None => Err(crate::SignalError::ReconnectInvalidState {
                connection: self.key,
                reason: "signal was dropped",
            }),
        }
    }
}

impl<A> Clone for Connection<A> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
            key: self.key,
            priority: self.priority,
            once: self.once,
        }
    }
}

impl<A> fmt::Debug for Connection<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("key", &self.key)
            .field("priority", &self.priority)
            .field("once", &self.once)
            .field("connected", &self.connected())
            .finish()
    }
}
