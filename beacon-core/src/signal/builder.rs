//! Signal configuration.

use std::fmt;
use std::sync::Arc;

use super::{Core, PrioritySignal, Signal};
use crate::dispatch::{Spawn, ThreadSpawner};

const DEFAULT_NAME: &str = "signal";

/// Configures a [`Signal`] or [`PrioritySignal`] before construction.
///
/// # Example
///
/// ```rust
/// use beacon_core::{InlineSpawner, SignalBuilder, Signal};
///
/// let signal: Signal<String> = SignalBuilder::new()
///     .name("chat")
///     .capacity(16)
///     .spawner(InlineSpawner)
///     .build();
///
/// assert_eq!(signal.name(), "chat");
/// ```
pub struct SignalBuilder {
    name: String,
    capacity: usize,
    spawner: Option<Arc<dyn Spawn>>,
}

impl SignalBuilder {
    /// Builder with the default settings: name `"signal"`, no preallocated
    /// slots, one thread per fired listener.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            capacity: 0,
            spawner: None,
        }
    }

    /// Label used in log events and, with the default spawner, in listener
    /// thread names.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of connection slots to allocate up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Execution primitive used by `fire`.
    pub fn spawner(mut self, spawner: impl Spawn) -> Self {
        self.spawner = Some(Arc::new(spawner));
        self
    }

    /// Build a plain signal.
    pub fn build<A>(self) -> Signal<A> {
        Signal::from_core(self.into_core())
    }

    /// Build a priority signal.
    pub fn build_priority<A>(self) -> PrioritySignal<A> {
        PrioritySignal::from_core(self.into_core())
    }

    fn into_core<A>(self) -> Arc<Core<A>> {
        let spawner: Arc<dyn Spawn> = match self.spawner {
            Some(spawner) => spawner,
            None => Arc::new(ThreadSpawner::named(format!("{}-listener", self.name))),
        };
        Arc::new(Core::new(Arc::from(self.name), self.capacity, spawner))
    }
}

impl Default for SignalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SignalBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBuilder")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("custom_spawner", &self.spawner.is_some())
            .finish()
    }
}
