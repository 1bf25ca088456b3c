//! Priority signals.
//!
//! A `PrioritySignal` is a [`Signal`] whose connections are grouped into
//! priority buckets. Fires visit buckets in ascending priority and each
//! bucket in registration order. The unprioritized operations are those of
//! the wrapped `Signal` and use bucket 0.

use std::fmt;
use std::sync::Arc;

use super::{Core, Signal, SignalBuilder};
use crate::connection::Connection;
use crate::dispatch::{erase, Args, IntoListenerResult};
use crate::error::Result;

/// A signal that orders its listeners by priority, lowest first.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use beacon_core::PrioritySignal;
///
/// let signal = PrioritySignal::<()>::new();
/// let order = Arc::new(Mutex::new(Vec::new()));
///
/// let log = order.clone();
/// signal.connect_priority(10, move |_| log.lock().unwrap().push("A")).unwrap();
/// let log = order.clone();
/// signal.connect_priority(0, move |_| log.lock().unwrap().push("B")).unwrap();
///
/// signal.fire_sync(&[]).unwrap();
/// assert_eq!(*order.lock().unwrap(), vec!["B", "A"]);
/// ```
pub struct PrioritySignal<A> {
    signal: Signal<A>,
}

impl<A> PrioritySignal<A> {
    pub(crate) fn from_core(core: Arc<Core<A>>) -> Self {
        Self {
            signal: Signal::from_core(core),
        }
    }

    /// Start configuring a priority signal; finish with
    /// [`SignalBuilder::build_priority`].
    pub fn builder() -> SignalBuilder {
        SignalBuilder::new()
    }

    /// The default-priority view of this signal.
    pub fn as_signal(&self) -> &Signal<A> {
        &self.signal
    }

    /// Priorities that currently have connected listeners, ascending.
    pub fn priorities(&self) -> Vec<i32> {
        self.signal.core().priorities()
    }

    pub fn disconnect_all(&self) {
        self.signal.disconnect_all();
    }

    pub fn destroy(&self) {
        self.signal.destroy();
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    pub fn is_destroyed(&self) -> bool {
        self.signal.is_destroyed()
    }

    pub fn name(&self) -> &str {
        self.signal.name()
    }
}

impl<A> PrioritySignal<A>
where
    A: Clone + Send + Sync + 'static,
{
    /// Priority signal with default settings.
    pub fn new() -> Self {
        SignalBuilder::new().build_priority()
    }

    /// Connect a listener at `priority`. Lower priorities run first; equal
    /// priorities run in registration order.
    pub fn connect_priority<F, R>(&self, priority: i32, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.connect_priority_bound(priority, &[], listener)
    }

    /// [`connect_priority`](Self::connect_priority) with bound arguments.
    pub fn connect_priority_bound<F, R>(
        &self,
        priority: i32,
        bound: &[A],
        listener: F,
    ) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal
            .core()
            .register(priority, false, Arc::from(bound), erase(listener))
    }

    /// One-shot connection at `priority`.
    pub fn once_priority<F, R>(&self, priority: i32, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal
            .core()
            .register(priority, true, Arc::from(&[][..]), erase(listener))
    }

    /// Block until the next fire reaches `priority`'s bucket.
    pub fn wait_priority(&self, priority: i32) -> Result<Args<A>> {
        self.signal.core().wait(priority)
    }

    /// Async form of [`wait_priority`](Self::wait_priority).
    pub async fn wait_priority_async(&self, priority: i32) -> Result<Args<A>> {
        self.signal.core().wait_async(priority).await
    }

    /// Connect at priority 0.
    pub fn connect<F, R>(&self, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal.connect(listener)
    }

    /// Connect at priority 0 with bound arguments.
    pub fn connect_bound<F, R>(&self, bound: &[A], listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal.connect_bound(bound, listener)
    }

    pub fn once<F, R>(&self, listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal.once(listener)
    }

    pub fn once_bound<F, R>(&self, bound: &[A], listener: F) -> Result<Connection<A>>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
        R: IntoListenerResult,
    {
        self.signal.once_bound(bound, listener)
    }

    pub fn wait(&self) -> Result<Args<A>> {
        self.signal.wait()
    }

    pub async fn wait_async(&self) -> Result<Args<A>> {
        self.signal.wait_async().await
    }

    pub fn fire(&self, args: &[A]) -> Result<usize> {
        self.signal.fire(args)
    }

    pub fn fire_sync(&self, args: &[A]) -> Result<usize> {
        self.signal.fire_sync(args)
    }
}

impl<A> Clone for PrioritySignal<A> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<A> Default for PrioritySignal<A>
where
    A: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> AsRef<Signal<A>> for PrioritySignal<A> {
    fn as_ref(&self) -> &Signal<A> {
        &self.signal
    }
}

impl<A> fmt::Debug for PrioritySignal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrioritySignal")
            .field("name", &self.name())
            .field("connections", &self.len())
            .field("priorities", &self.priorities())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InlineSpawner;
    use parking_lot::Mutex;

    fn recorder() -> (PrioritySignal<u8>, Arc<Mutex<Vec<&'static str>>>) {
        let signal = PrioritySignal::<u8>::builder().spawner(InlineSpawner).build_priority();
        (signal, Arc::new(Mutex::new(Vec::new())))
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> impl Fn(&[u8]) + Send + Sync {
        let log = log.clone();
        move |_| log.lock().push(label)
    }

    #[test]
    fn lower_priorities_fire_first() {
        let (signal, log) = recorder();
        signal.connect_priority(5, push(&log, "five-a")).unwrap();
        signal.connect_priority(-1, push(&log, "minus-one")).unwrap();
        signal.connect(push(&log, "zero")).unwrap();
        signal.connect_priority(5, push(&log, "five-b")).unwrap();

        signal.fire_sync(&[]).unwrap();
        assert_eq!(*log.lock(), vec!["minus-one", "zero", "five-a", "five-b"]);
        assert_eq!(signal.priorities(), vec![-1, 0, 5]);
    }

    #[test]
    fn reconnect_returns_to_its_bucket_tail() {
        let (signal, log) = recorder();
        let first = signal.connect_priority(1, push(&log, "first")).unwrap();
        signal.connect_priority(1, push(&log, "second")).unwrap();
        signal.connect_priority(2, push(&log, "later")).unwrap();

        first.disconnect();
        first.reconnect().unwrap();

        signal.fire(&[]).unwrap();
        assert_eq!(*log.lock(), vec!["second", "first", "later"]);
    }

    #[test]
    fn once_priority_fires_once_in_order() {
        let (signal, log) = recorder();
        signal.connect_priority(3, push(&log, "steady")).unwrap();
        signal.once_priority(1, push(&log, "once")).unwrap();

        signal.fire_sync(&[]).unwrap();
        signal.fire_sync(&[]).unwrap();
        assert_eq!(*log.lock(), vec!["once", "steady", "steady"]);
    }

    #[test]
    fn disconnect_all_clears_every_bucket() {
        let (signal, log) = recorder();
        signal.connect_priority(1, push(&log, "a")).unwrap();
        signal.connect_priority(9, push(&log, "b")).unwrap();

        signal.disconnect_all();
        assert!(signal.priorities().is_empty());
        assert_eq!(signal.fire_sync(&[]), Ok(0));
        assert!(log.lock().is_empty());
    }
}
