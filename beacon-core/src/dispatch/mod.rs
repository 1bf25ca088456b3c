//! Dispatch
//!
//! Firing walks a snapshot of the signal's live connections, taken when the
//! call starts, and runs each one with its bound arguments followed by the
//! fired arguments.
//!
//! # Disciplines
//!
//! - `fire` hands every listener to the signal's [`Spawn`] implementation and
//!   returns without waiting. Failures are logged by the task itself.
//! - `fire_sync` runs every listener inline, in order, and returns once all
//!   of them finished. Failures are collected and returned together; one
//!   failing listener never stops the rest.
//!
//! # Snapshot Rules
//!
//! Connections added while a fire is in progress are not part of it. A
//! connection disconnected before its turn is skipped: `fire_sync` checks
//! right before invoking, `fire` checks before spawning and again inside the
//! task. One-shot connections are unlinked the moment they are claimed, so
//! they run at most once even under reentrant or concurrent fires.
//!
//! A task outlives the `fire` call and may outlive the signal itself. Only
//! disconnection cancels it; if the signal is gone by the time the task runs,
//! the listener still runs.

mod listener;
mod spawner;

pub use listener::{Args, BoxError, IntoListenerResult};
pub use spawner::{InlineSpawner, Spawn, Task, ThreadSpawner, TokioSpawner};

pub(crate) use listener::{erase, invoke, ListenerFn};

use std::sync::Arc;

use tracing::{error, trace, warn};

use crate::connection::registry::Entry;
use crate::error::{ListenerFailure, Result, SignalError};
use crate::signal::Core;

impl<A> Entry<A>
where
    A: Clone,
{
    /// Bound arguments followed by fired arguments.
    fn arguments(&self, fired: &[A]) -> Args<A> {
        let mut args = Args::with_capacity(self.bound.len() + fired.len());
        args.extend(self.bound.iter().cloned());
        args.extend(fired.iter().cloned());
        args
    }
}

impl<A> Core<A>
where
    A: Clone + Send + Sync + 'static,
{
    fn snapshot(&self) -> Result<Vec<Entry<A>>> {
        let registry = self.registry.lock();
        if registry.is_destroyed() {
            return Err(SignalError::Destroyed);
        }
        Ok(registry.snapshot())
    }

    fn claim(&self, entry: &Entry<A>) -> bool {
        self.registry.lock().claim(entry.key)
    }

    /// Schedule every live listener on the spawner. Returns how many the
    /// spawner accepted.
    pub(crate) fn fire(self: &Arc<Self>, fired: &[A]) -> Result<usize> {
        let snapshot = self.snapshot()?;
        let mut scheduled = 0;

        for entry in snapshot {
            if !self.claim(&entry) {
                continue;
            }

            let (key, once) = (entry.key, entry.once);
            let args = entry.arguments(fired);
            let core = Arc::downgrade(self);
            let name = Arc::clone(&self.name);

            trace!(signal = %name, connection = %key, "scheduling listener");
            let spawned = self.spawner.spawn(Box::new(move || {
                if !entry.once {
                    let still_active = core
                        .upgrade()
                        .map_or(true, |core| core.is_active(entry.key));
                    if !still_active {
                        trace!(signal = %name, connection = %entry.key, "listener cancelled before it ran");
                        return;
                    }
                }
                if let Err(kind) = invoke(&*entry.listener, &args) {
                    error!(signal = %name, connection = %entry.key, failure = %kind, "listener failed");
                }
            }));

            match spawned {
                Ok(()) => scheduled += 1,
                Err(err) => {
                    error!(signal = %self.name, connection = %key, error = %err, "failed to spawn listener");
                    if once {
                        // Hand the claim back so the listener runs on a later fire.
                        self.registry.lock().relink(key);
                    }
                }
            }
        }

        Ok(scheduled)
    }

    /// Run every live listener inline. Returns how many ran.
    pub(crate) fn fire_sync(&self, fired: &[A]) -> Result<usize> {
        let snapshot = self.snapshot()?;
        let mut invoked = 0;
        let mut failures = Vec::new();

        for entry in snapshot {
            if !self.claim(&entry) {
                continue;
            }

            let args = entry.arguments(fired);
            trace!(signal = %self.name, connection = %entry.key, "invoking listener");
            invoked += 1;

            if let Err(kind) = invoke(&*entry.listener, &args) {
                warn!(signal = %self.name, connection = %entry.key, failure = %kind, "listener failed");
                failures.push(ListenerFailure {
                    connection: entry.key,
                    kind,
                });
            }
        }

        if failures.is_empty() {
            Ok(invoked)
        } else {
            Err(SignalError::ListenerFailures(failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::{Signal, SignalBuilder};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn inline() -> Signal<i32> {
        SignalBuilder::new().spawner(InlineSpawner).build()
    }

    fn explode(_: &[i32]) {
        panic!("exploded");
    }

    #[test]
    fn bound_arguments_come_first() {
        let signal = inline();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        signal
            .connect_bound(&[1, 2], move |args| seen_clone.lock().push(args.to_vec()))
            .unwrap();
        signal.fire_sync(&[3, 4]).unwrap();
        signal.fire(&[5]).unwrap();

        assert_eq!(*seen.lock(), vec![vec![1, 2, 3, 4], vec![1, 2, 5]]);
    }

    #[test]
    fn fire_sync_collects_every_failure() {
        let signal = inline();
        let ran = Arc::new(AtomicUsize::new(0));

        let first = signal
            .connect(|_| -> std::result::Result<(), BoxError> { Err("first".into()) })
            .unwrap();
        let ran_clone = ran.clone();
        signal
            .connect(move |_| {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let second = signal.connect(explode).unwrap();

        let error = signal.fire_sync(&[]).unwrap_err();
        assert_eq!(
            error,
            SignalError::ListenerFailures(vec![
                ListenerFailure {
                    connection: first.key(),
                    kind: FailureKind::Error("first".into()),
                },
                ListenerFailure {
                    connection: second.key(),
                    kind: FailureKind::Panic("exploded".into()),
                },
            ])
        );
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fire_swallows_failures() {
        let signal = inline();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();

        signal.connect(explode).unwrap();
        signal
            .connect(move |_| {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(signal.fire(&[]), Ok(2));
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disconnect_during_dispatch_skips_later_listeners() {
        let signal = inline();
        let ran = Arc::new(AtomicUsize::new(0));
        let victim = Arc::new(Mutex::new(None::<crate::Connection<i32>>));

        let victim_clone = victim.clone();
        signal
            .connect(move |_| {
                if let Some(connection) = victim_clone.lock().as_ref() {
                    connection.disconnect();
                }
            })
            .unwrap();
        let ran_clone = ran.clone();
        let target = signal
            .connect(move |_| {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        *victim.lock() = Some(target);

        assert_eq!(signal.fire_sync(&[]), Ok(1));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn connections_added_during_dispatch_wait_for_the_next_fire() {
        let signal = inline();
        let added = Arc::new(AtomicUsize::new(0));

        let inner = signal.clone();
        let added_clone = added.clone();
        signal
            .connect(move |_| {
                let added = added_clone.clone();
                inner
                    .connect(move |_| {
                        added.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            })
            .unwrap();

        assert_eq!(signal.fire_sync(&[]), Ok(1));
        assert_eq!(added.load(Ordering::SeqCst), 0);

        assert_eq!(signal.fire_sync(&[]), Ok(2));
        assert_eq!(added.load(Ordering::SeqCst), 1);
    }

    type Queue = Arc<Mutex<Vec<Task>>>;

    /// Signal whose spawner parks tasks in a queue until `drain` runs them.
    fn deferred() -> (Signal<i32>, Queue) {
        let queue = Queue::default();
        let pending = queue.clone();
        let signal = SignalBuilder::new()
            .spawner(move |task: Task| pending.lock().push(task))
            .build();
        (signal, queue)
    }

    fn drain(queue: &Queue) -> usize {
        let tasks = std::mem::take(&mut *queue.lock());
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&[i32]) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        (count, move |_: &[i32]| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    struct Refusing;

    impl Spawn for Refusing {
        fn spawn(&self, _task: Task) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no threads left"))
        }
    }

    #[test]
    fn scheduled_listener_runs_after_the_signal_is_dropped() {
        let (signal, queue) = deferred();
        let (count, listener) = counter();
        signal.connect(listener).unwrap();

        assert_eq!(signal.fire(&[1]), Ok(1));
        drop(signal);

        assert_eq!(drain(&queue), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disconnect_before_the_task_runs_cancels_it() {
        let (signal, queue) = deferred();
        let (kept, listener) = counter();
        signal.connect(listener).unwrap();
        let (cancelled, listener) = counter();
        let connection = signal.connect(listener).unwrap();

        assert_eq!(signal.fire(&[]), Ok(2));
        connection.disconnect();

        assert_eq!(drain(&queue), 2);
        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn deferred_once_is_claimed_by_the_first_fire() {
        let (signal, queue) = deferred();
        let (count, listener) = counter();
        let connection = signal.once(listener).unwrap();

        assert_eq!(signal.fire(&[]), Ok(1));
        assert_eq!(signal.fire(&[]), Ok(0));
        assert!(!connection.connected());

        assert_eq!(drain(&queue), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn refused_tasks_are_not_counted() {
        let signal: Signal<i32> = SignalBuilder::new().spawner(Refusing).build();
        let (plain, listener) = counter();
        signal.connect(listener).unwrap();
        let (once, listener) = counter();
        let connection = signal.once(listener).unwrap();

        assert_eq!(signal.fire(&[]), Ok(0));
        // The one-shot claim was handed back.
        assert!(connection.connected());

        assert_eq!(signal.fire_sync(&[]), Ok(2));
        assert!(!connection.connected());
        assert_eq!(plain.load(Ordering::SeqCst), 1);
        assert_eq!(once.load(Ordering::SeqCst), 1);
    }
}
