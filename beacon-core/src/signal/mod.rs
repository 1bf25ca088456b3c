//! Signals
//!
//! This module implements the two signal façades and everything they share.
//!
//! # Concepts
//!
//! ## Signal
//!
//! A [`Signal`] is an event source. Listeners connect to it and are run,
//! in registration order, every time it fires. Each connection may carry
//! bound arguments, which are passed ahead of whatever the fire supplies.
//!
//! ## PrioritySignal
//!
//! A [`PrioritySignal`] wraps a `Signal` and adds priority buckets. Lower
//! priorities run first; connections made without a priority go to bucket 0.
//!
//! ## Lifecycle
//!
//! Connections are disconnected and reconnected through their
//! [`Connection`](crate::Connection) handle. `disconnect_all` unlinks
//! everything but keeps the signal usable; `destroy` also drops every
//! listener and turns the signal inert for good.
//!
//! # Implementation Notes
//!
//! Every handle to a signal points at one shared `Core`: the connection
//! registry behind a `parking_lot::Mutex`, the spawner used by `fire`, and the
//! signal's name. `Signal` and `PrioritySignal` are thin wrappers over it, and
//! connection handles keep only a weak reference.

mod builder;
mod object;
mod plain;
mod priority;
mod shared;
mod wait;

pub use builder::SignalBuilder;
pub use object::{is_connection, is_signal, ObjectKind, SignalObject};
pub use plain::Signal;
pub use priority::PrioritySignal;

pub(crate) use shared::Core;
