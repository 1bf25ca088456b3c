//! Beacon Core
//!
//! This crate provides in-process signals: event sources that decouple the
//! code raising an event from the code reacting to it. It implements:
//!
//! - Plain signals, firing listeners in registration order
//! - Priority signals, firing lower priorities first
//! - Disconnectable, reconnectable connection handles
//! - One-shot connections and blocking or async waits
//! - Concurrent (`fire`) and synchronous (`fire_sync`) dispatch
//!
//! Nothing here crosses a process boundary; all state lives in memory for as
//! long as the signal does.
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - `connection`: connection handles and the slot arena with its intrusive
//!   per-priority lists
//! - `dispatch`: listener invocation, failure capture, and spawners
//! - `signal`: the `Signal` / `PrioritySignal` façades, configuration, waits
//!
//! # Example
//!
//! ```rust
//! use beacon_core::Signal;
//!
//! let signal = Signal::<String>::new();
//!
//! let connection = signal
//!     .connect_bound(&["greeting".to_owned()], |args| {
//!         println!("{}: {}", args[0], args[1]);
//!     })
//!     .unwrap();
//!
//! // Runs the listener on this thread: prints "greeting: hello".
//! signal.fire_sync(&["hello".to_owned()]).unwrap();
//!
//! connection.disconnect();
//! assert_eq!(signal.fire_sync(&["ignored".to_owned()]).unwrap(), 0);
//! ```

pub mod connection;
pub mod dispatch;
pub mod signal;
mod error;

pub use connection::{Connection, ConnectionKey};
pub use dispatch::{Args, BoxError, InlineSpawner, IntoListenerResult, Spawn, ThreadSpawner, TokioSpawner};
pub use error::{FailureKind, ListenerFailure, Result, SignalError};
pub use signal::{is_connection, is_signal, ObjectKind, PrioritySignal, Signal, SignalBuilder, SignalObject};
