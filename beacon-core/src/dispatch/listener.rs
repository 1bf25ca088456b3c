//! Listener callables.
//!
//! Listeners are stored type-erased as `Arc<dyn Fn(&[A]) -> Result<(), BoxError>>`
//! so a snapshot of the registry only bumps reference counts. Anything
//! returning `()` or `Result<(), E>` can be connected.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::FailureKind;

/// The argument list a listener receives: bound arguments followed by the
/// fired arguments.
pub type Args<A> = SmallVec<[A; 4]>;

/// Boxed error type listeners may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-erased listener as stored in a slot.
pub(crate) type ListenerFn<A> = dyn Fn(&[A]) -> Result<(), BoxError> + Send + Sync + 'static;

/// Return types a listener may have.
pub trait IntoListenerResult {
    /// Normalize the listener's return value.
    fn into_listener_result(self) -> Result<(), BoxError>;
}

impl IntoListenerResult for () {
    fn into_listener_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoListenerResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_listener_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// Erase a listener closure into its stored form.
pub(crate) fn erase<A, F, R>(listener: F) -> Arc<ListenerFn<A>>
where
    F: Fn(&[A]) -> R + Send + Sync + 'static,
    R: IntoListenerResult,
{
    Arc::new(move |args: &[A]| listener(args).into_listener_result())
}

/// Run a listener, converting both `Err` returns and panics into a
/// [`FailureKind`].
pub(crate) fn invoke<A>(listener: &ListenerFn<A>, args: &[A]) -> Result<(), FailureKind> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener(args))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(FailureKind::Error(error.to_string())),
        Err(payload) => Err(FailureKind::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
