//! Spawners
//!
//! [`Signal::fire`](crate::Signal::fire) does not run listeners itself; it
//! hands each one to a [`Spawn`] implementation as a self-contained task.
//! Failures inside a task are caught and logged before the task returns, so a
//! spawner never has to deal with them. A spawner only reports whether it
//! accepted the task; a refused task is not counted as scheduled.

use std::io;

use tokio::runtime::Handle;

/// A unit of work handed to a spawner.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget execution of listener tasks.
pub trait Spawn: Send + Sync + 'static {
    /// Run `task` independently of the caller. Must not block on the task.
    ///
    /// Returns an error if the task could not be started; it has been
    /// dropped without running in that case.
    fn spawn(&self, task: Task) -> io::Result<()>;
}

impl<F> Spawn for F
where
    F: Fn(Task) + Send + Sync + 'static,
{
    fn spawn(&self, task: Task) -> io::Result<()> {
        self(task);
        Ok(())
    }
}

/// Runs every task on a fresh OS thread. This is the default spawner.
#[derive(Debug, Clone)]
pub struct ThreadSpawner {
    name: String,
}

impl ThreadSpawner {
    /// Spawner whose threads carry the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::named("beacon-listener")
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: Task) -> io::Result<()> {
        std::thread::Builder::new()
            .name(self.name.clone())
            .spawn(task)
            .map(drop)
    }
}

/// Runs tasks on a tokio runtime's blocking pool.
///
/// Listeners are synchronous and may block, so they go through
/// `spawn_blocking` rather than onto the async workers.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Spawner bound to the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawner bound to the runtime the caller is running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Spawn for TokioSpawner {
    fn spawn(&self, task: Task) -> io::Result<()> {
        // Detached; the task reports its own failures.
        drop(self.handle.spawn_blocking(task));
        Ok(())
    }
}

/// Runs tasks immediately on the calling thread.
///
/// Useful for single-threaded hosts and deterministic tests. With this
/// spawner `fire` behaves like `fire_sync` except that failures are logged
/// instead of returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSpawner;

impl Spawn for InlineSpawner {
    fn spawn(&self, task: Task) -> io::Result<()> {
        task();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};

    #[test]
    fn inline_runs_immediately() {
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();

        InlineSpawner
            .spawn(Box::new(move || {
                ran_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn thread_spawner_names_threads() {
        let (tx, rx) = mpsc::channel();

        ThreadSpawner::named("beacon-test")
            .spawn(Box::new(move || {
                let name = std::thread::current().name().map(str::to_owned);
                tx.send(name).unwrap();
            }))
            .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("beacon-test"));
    }

    #[test]
    fn closures_are_spawners() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let spawner = move |task: Task| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            task();
        };

        spawner.spawn(Box::new(|| {})).unwrap();
        spawner.spawn(Box::new(|| {})).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tokio_spawner_needs_a_runtime() {
        assert!(TokioSpawner::current().is_none());

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();
        assert!(TokioSpawner::current().is_some());
    }
}
