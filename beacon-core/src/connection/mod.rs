//! Connections
//!
//! A connection is one listener registration on a signal. Signals keep their
//! connections in a slot arena with intrusive, index-linked lists (see
//! `registry`), and hand callers a [`Connection`] handle that can disconnect
//! and reconnect the registration.
//!
//! Handles hold only a weak reference to the signal. Dropping a handle never
//! disconnects anything; dropping or destroying the signal turns every handle
//! inert.

mod handle;
mod key;
pub(crate) mod registry;

pub use handle::Connection;
pub use key::ConnectionKey;
