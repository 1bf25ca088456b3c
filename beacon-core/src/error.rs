//! Error types for signals and their connections.

use thiserror::Error;

use crate::connection::ConnectionKey;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors reported by [`Signal`](crate::Signal), [`PrioritySignal`](crate::PrioritySignal)
/// and [`Connection`](crate::Connection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal was destroyed. Connecting, firing and waiting all fail with
    /// this once [`destroy`](crate::Signal::destroy) has run.
    #[error("signal has been destroyed")]
    Destroyed,

    /// A connection could not be reconnected.
    #[error("cannot reconnect {connection}: {reason}")]
    ReconnectInvalidState {
        connection: ConnectionKey,
        reason: &'static str,
    },

    /// A pending wait lost its registration before the signal fired, e.g.
    /// because its slot was disconnected and later reused.
    #[error("wait was abandoned before the signal fired")]
    Abandoned,

    /// One or more listeners failed during a synchronous fire. Every failure
    /// is listed, in dispatch order.
    #[error("{} listener(s) failed during dispatch", .0.len())]
    ListenerFailures(Vec<ListenerFailure>),
}

/// A single listener that failed while being dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener {connection} {kind}")]
pub struct ListenerFailure {
    /// The connection whose listener failed.
    pub connection: ConnectionKey,
    /// How it failed.
    pub kind: FailureKind,
}

/// How a listener failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// The listener returned `Err`.
    #[error("returned an error: {0}")]
    Error(String),

    /// The listener panicked.
    #[error("panicked: {0}")]
    Panic(String),
}
