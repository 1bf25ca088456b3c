//! Tagged union over the crate's handle types, for code that stores signals
//! and connections side by side and needs to tell them apart.

use super::{PrioritySignal, Signal};
use crate::connection::Connection;

/// Which kind of object a [`SignalObject`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Signal,
    PrioritySignal,
    Connection,
}

/// A signal, priority signal or connection.
#[derive(Debug, Clone)]
pub enum SignalObject<A> {
    Signal(Signal<A>),
    Priority(PrioritySignal<A>),
    Connection(Connection<A>),
}

impl<A> SignalObject<A> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Signal(_) => ObjectKind::Signal,
            Self::Priority(_) => ObjectKind::PrioritySignal,
            Self::Connection(_) => ObjectKind::Connection,
        }
    }

    /// True for both plain and priority signals.
    pub fn is_signal(&self) -> bool {
        matches!(self, Self::Signal(_) | Self::Priority(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl<A> From<Signal<A>> for SignalObject<A> {
    fn from(signal: Signal<A>) -> Self {
        Self::Signal(signal)
    }
}

impl<A> From<PrioritySignal<A>> for SignalObject<A> {
    fn from(signal: PrioritySignal<A>) -> Self {
        Self::Priority(signal)
    }
}

impl<A> From<Connection<A>> for SignalObject<A> {
    fn from(connection: Connection<A>) -> Self {
        Self::Connection(connection)
    }
}

/// Whether `object` is a plain or priority signal.
pub fn is_signal<A>(object: &SignalObject<A>) -> bool {
    object.is_signal()
}

/// Whether `object` is a connection handle.
pub fn is_connection<A>(object: &SignalObject<A>) -> bool {
    object.is_connection()
}
