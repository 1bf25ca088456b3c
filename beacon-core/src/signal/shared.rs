//! State shared by every handle to one signal.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::connection::registry::{Registration, Registry, Relink};
use crate::connection::{Connection, ConnectionKey};
use crate::dispatch::{ListenerFn, Spawn};
use crate::error::{Result, SignalError};

/// Registry, spawner and name of one signal.
///
/// The registry lock is only held for list operations, never while a
/// listener runs, so listeners may freely call back into the signal.
pub(crate) struct Core<A> {
    /// Label carried by every log event of this signal.
    pub(crate) name: Arc<str>,
    /// Connections, guarded by the one lock of the signal.
    pub(crate) registry: Mutex<Registry<A>>,
    /// Runs the tasks handed out by `fire`.
    pub(crate) spawner: Arc<dyn Spawn>,
}

impl<A> Core<A> {
    pub(crate) fn new(name: Arc<str>, capacity: usize, spawner: Arc<dyn Spawn>) -> Self {
        Self {
            name,
            registry: Mutex::new(Registry::with_capacity(capacity)),
            spawner,
        }
    }

    pub(crate) fn register(
        self: &Arc<Self>,
        priority: i32,
        once: bool,
        bound: Arc<[A]>,
        listener: Arc<ListenerFn<A>>,
    ) -> Result<Connection<A>> {
        let key = self.insert(Registration {
            priority,
            once,
            waiter: false,
            listener,
            bound,
        })?;
        Ok(Connection::new(self, key, priority, once))
    }

    /// Register the one-shot listener behind a `wait`. No handle is handed
    /// out; `disconnect_all` drops the listener to release the waiter.
    pub(crate) fn register_waiter(
        &self,
        priority: i32,
        listener: Arc<ListenerFn<A>>,
    ) -> Result<ConnectionKey> {
        self.insert(Registration {
            priority,
            once: true,
            waiter: true,
            listener,
            bound: Arc::from(Vec::new()),
        })
    }

    fn insert(&self, registration: Registration<A>) -> Result<ConnectionKey> {
        let (priority, once) = (registration.priority, registration.once);
        let (key, displaced) = {
            let mut registry = self.registry.lock();
            if registry.is_destroyed() {
                return Err(SignalError::Destroyed);
            }
            registry.insert(registration)
        };
        drop(displaced);

        debug!(signal = %self.name, connection = %key, priority, once, "connected");
        Ok(key)
    }

    pub(crate) fn is_active(&self, key: ConnectionKey) -> bool {
        self.registry.lock().is_active(key)
    }

    pub(crate) fn disconnect(&self, key: ConnectionKey) {
        let unlinked = self.registry.lock().unlink(key);
        if unlinked {
            debug!(signal = %self.name, connection = %key, "disconnected");
        }
    }

    pub(crate) fn reconnect(&self, key: ConnectionKey) -> Result<()> {
        let outcome = {
            let mut registry = self.registry.lock();
            if registry.is_destroyed() {
                return Err(SignalError::ReconnectInvalidState {
                    connection: key,
                    reason: "signal was destroyed",
                });
            }
            registry.relink(key)
        };

        match outcome {
            Relink::Relinked => {
                debug!(signal = %self.name, connection = %key, "reconnected");
                Ok(())
            }
            Relink::AlreadyLinked => Ok(()),
            Relink::Stale => Err(SignalError::ReconnectInvalidState {
                connection: key,
                reason: "slot was reused by another connection",
            }),
        }
    }

    pub(crate) fn disconnect_all(&self) {
        let (count, released) = {
            let mut registry = self.registry.lock();
            if registry.is_destroyed() {
                return;
            }
            registry.unlink_all()
        };
        let waiters = released.len();
        drop(released);
        debug!(signal = %self.name, count, waiters, "disconnected all");
    }

    pub(crate) fn destroy(&self) {
        let (released, reclaimed) = {
            let mut registry = self.registry.lock();
            if registry.is_destroyed() {
                return;
            }
            let (_, released) = registry.unlink_all();
            registry.mark_destroyed();
            (released, registry.clear())
        };
        let count = reclaimed.len();
        // Listeners (and any waiters they hold) are dropped outside the lock.
        drop(released);
        drop(reclaimed);
        debug!(signal = %self.name, reclaimed = count, "destroyed");
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.lock().len()
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.registry.lock().is_destroyed()
    }

    pub(crate) fn priorities(&self) -> Vec<i32> {
        self.registry.lock().priorities()
    }
}
