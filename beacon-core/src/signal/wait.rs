//! Waiting for the next fire.
//!
//! A wait is a one-shot connection whose listener forwards the argument list
//! through a `oneshot` channel. The blocking form parks the calling thread on
//! the receiver; the async form awaits it. There is no timeout.
//!
//! A waiter wakes without a value when its listener is dropped: by `destroy`
//! (reported as `Destroyed`) or by `disconnect_all` (`Abandoned`).

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::Core;
use crate::dispatch::{erase, Args};
use crate::error::{Result, SignalError};

impl<A> Core<A>
where
    A: Clone + Send + Sync + 'static,
{
    fn waiter(&self, priority: i32) -> Result<oneshot::Receiver<Args<A>>> {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));

        let listener = erase(move |args: &[A]| {
            if let Some(tx) = tx.lock().take() {
                // The waiter may have given up; nothing to do then.
                let _ = tx.send(args.iter().cloned().collect());
            }
        });
        self.register_waiter(priority, listener)?;
        Ok(rx)
    }

    /// Why a waiter was released without a value.
    fn released(&self) -> SignalError {
        if self.is_destroyed() {
            SignalError::Destroyed
        } else {
            SignalError::Abandoned
        }
    }

    pub(crate) fn wait(self: &Arc<Self>, priority: i32) -> Result<Args<A>> {
        let rx = self.waiter(priority)?;
        rx.blocking_recv().map_err(|_| self.released())
    }

    pub(crate) async fn wait_async(self: &Arc<Self>, priority: i32) -> Result<Args<A>> {
        let rx = self.waiter(priority)?;
        rx.await.map_err(|_| self.released())
    }
}
