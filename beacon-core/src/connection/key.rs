//! Connection keys.
//!
//! A key names one registration inside a signal's slot arena. Slots are
//! recycled, so a key pairs the slot index with the slot's generation: once a
//! slot is handed to a newer registration, keys minted for the older one stop
//! resolving.

use std::fmt;

/// Identifier of a single registration within its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    index: usize,
    generation: u64,
}

impl ConnectionKey {
    pub(crate) fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Index of the slot in the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// How many times the slot had been reused when this key was minted.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
