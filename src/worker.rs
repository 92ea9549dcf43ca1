//! Background thread and cancellation for the collection loop.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Cancellation signal for a running collection loop.
///
/// The loop checks the signal before every cycle and sleeps on it between
/// cycles, so triggering it ends the loop without waiting out the interval.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    /// Creates a new, untriggered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop and wakes it up if it is sleeping.
    pub fn trigger(&self) {
        let (lock, cvar) = self.inner.as_ref();
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    /// Returns whether a stop was requested.
    pub fn is_triggered(&self) -> bool {
        *self.inner.0.lock().unwrap()
    }

    /// Sleeps for `timeout`, returning early if the signal is triggered.
    ///
    /// Returns `true` if a stop was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (lock, cvar) = self.inner.as_ref();
        let mut stopped = lock.lock().unwrap();
        while !*stopped {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) if !remaining.is_zero() => remaining,
                _ => break,
            };
            // spurious wakeups loop around with the remaining time
            stopped = cvar.wait_timeout(stopped, remaining).unwrap().0;
        }
        *stopped
    }
}

/// Keeps the background collector running.
///
/// Dropping the guard stops the collector and waits for its thread to exit.
/// Use [`detach`](Self::detach) to keep it running until the process exits.
#[must_use = "dropping the guard stops the collector"]
#[derive(Debug)]
pub struct CollectorGuard {
    shutdown: Shutdown,
    worker: Option<JoinHandle<()>>,
}

impl CollectorGuard {
    pub(crate) fn new(shutdown: Shutdown, worker: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            worker: Some(worker),
        }
    }

    /// Returns whether the collector thread is still running.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |worker| !worker.is_finished())
    }

    /// Stops the collector and waits for the current cycle to finish.
    pub fn shutdown(self) {
        drop(self);
    }

    /// Lets the collector run for the rest of the process lifetime.
    pub fn detach(mut self) {
        self.worker.take();
    }
}

impl Drop for CollectorGuard {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.shutdown.trigger();
            if worker.join().is_err() {
                log::error!("collector thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_elapses() {
        let shutdown = Shutdown::new();
        let start = Instant::now();
        assert!(!shutdown.wait_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_trigger_wakes_sleeper() {
        let shutdown = Shutdown::new();
        let sleeper = shutdown.clone();
        let start = Instant::now();
        let handle = std::thread::spawn(move || sleeper.wait_timeout(Duration::from_secs(30)));

        std::thread::sleep(Duration::from_millis(20));
        shutdown.trigger();

        assert!(handle.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_triggered_before_wait() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.wait_timeout(Duration::from_secs(30)));
    }
}
