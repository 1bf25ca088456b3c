//! Plain signals: listeners fire in registration order.

use std::fmt;
use std::sync::Arc;

use super::{Core, SignalBuilder};
use crate::connection::Connection;
use crate::dispatch::{erase, Args, IntoListenerResult};
use crate::error::Result;

/// An event source listeners can connect to.
///
/// `A` is the argument type; every fire delivers a list of `A`, preceded by
/// the connection's bound arguments. A `Signal` is a cheap handle: clones
/// share the same connections.
///
/// Once [`destroy`](Self::destroy) has run, connecting, firing and waiting
/// all return [`SignalError::Destroyed`](crate::SignalError::Destroyed).
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use beacon_core::Signal;
///
/// let signal = Signal::<i32>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = seen.clone();
/// signal.connect(move |args| log.lock().unwrap().push(("f", args[0]))).unwrap();
/// let log = seen.clone();
/// signal.connect(move |args| log.lock().unwrap().push(("g", args[0]))).unwrap();
///
/// signal.fire_sync(&[1]).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![("f", 1), ("g", 1)]);
/// ```
pub struct Signal<A> {
    core: Arc<Core<A>>,
}

impl<A> Signal<A> {
    pub(crate) fn from_core(core: Arc<Core<A>>) -> Self {
        Self { core }
    }

    /// Start configuring a signal.
    pub fn builder() -> SignalBuilder {
        SignalBuilder::new()
    }

    /// Disconnect every listener. The signal stays usable, and the returned
    /// connections can still be reconnected. Pending waiters are released
    /// with [`SignalError::Abandoned`](crate::SignalError::Abandoned).
    /// No-op once destroyed.
    pub fn disconnect_all(&self) {
        self.core.disconnect_all();
    }

    /// Disconnect every listener and make the signal permanently inert.
    ///
    /// Pending waiters are released with
    /// [`SignalError::Destroyed`](crate::SignalError::Destroyed). Destroying
    /// twice is a no-op.
    pub fn destroy(&self) {
        self.core.destroy();
    }

    /// Number of connected listeners.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }

    /// The name given at construction, used in log events.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub(crate) fn core(&self) -> &Arc<Core<A>> {
        &self.core
    }
}

impl<A> Signal<A>
where
    A: Clone + Send + Sync + 'static,
{
    /// Signal with default settings.
    pub fn new() -> Self {
        SignalBuilder::new().build()
    }

    /// Connect a listener. It runs on every fire until disconnected.
    pub fn connect<F, R>(&self, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.connect_bound(&[], listener)
    }

    /// Connect a listener that receives `bound` ahead of the fired arguments.
    pub fn connect_bound<F, R>(&self, bound: &[A], listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.core.register(0, false, Arc::from(bound), erase(listener))
    }

    /// Connect a listener that disconnects itself before its first run.
    pub fn once<F, R>(&self, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.once_bound(&[], listener)
    }

    /// [`once`](Self::once) with bound arguments.
    pub fn once_bound<F, R>(&self, bound: &[A], listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.core.register(0, true, Arc::from(bound), erase(listener))
    }

    /// Block the calling thread until the next fire and return its arguments.
    ///
    /// There is no timeout. Must not be called from inside an async runtime
    /// (tokio panics on blocking there); use [`wait_async`](Self::wait_async).
    pub fn wait(&self) -> Result<Args<A>> {
        self.core.wait(0)
    }

    /// Wait for the next fire without blocking a thread.
    pub async fn wait_async(&self) -> Result<Args<A>> {
        self.core.wait_async(0).await
    }

    /// Hand every connected listener to the spawner and return immediately.
    ///
    /// Returns how many listeners were scheduled. Listener failures are
    /// logged, never returned.
    pub fn fire(&self, args: &[A]) -> Result<usize> {
        self.core.fire(args)
    }

    /// Run every connected listener on this thread, in order, and return
    /// once all have finished.
    ///
    /// Returns how many listeners ran, or
    /// [`SignalError::ListenerFailures`](crate::SignalError::ListenerFailures)
    /// listing each one that failed; the others still ran.
    pub fn fire_sync(&self, args: &[A]) -> Result<usize> {
        self.core.fire_sync(args)
    }
}

impl<A> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<A> Default for Signal<A>
where
    A: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name())
            .field("connections", &self.len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
