#![forbid(unsafe_code)]

//! One-shot background work that outlives render passes.
//!
//! A render pass must run to completion quickly; anything slow (a network
//! fetch, a big computation) belongs on a worker thread. [`BackgroundTask`]
//! spawns the work once and lets later passes poll for the result without
//! blocking. Stash the task in the
//! [`ResourceCache`](crate::cache::ResourceCache) so every pass — and every
//! session — polls the *same* task instead of spawning a new one per rerun.
//!
//! The result crosses threads over an `mpsc` channel; the receiver sits
//! behind a `Mutex` only because a cached task is polled from whichever
//! thread runs the current pass.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, mpsc};
use std::thread;

/// A spawned computation whose result can be claimed exactly once.
pub struct BackgroundTask<T> {
    rx: Mutex<mpsc::Receiver<T>>,
    claimed: AtomicBool,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Run `work` on a new worker thread.
    ///
    /// The thread is detached; dropping the task simply abandons the
    /// result. If `work` panics, the task reports as finished with no
    /// result.
    #[must_use]
    pub fn spawn(work: impl FnOnce() -> T + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // A send error means the task was dropped; the result is
            // simply unwanted.
            let _ = tx.send(work());
        });
        Self {
            rx: Mutex::new(rx),
            claimed: AtomicBool::new(false),
        }
    }

    /// Claim the result if it is ready. Non-blocking.
    ///
    /// Returns `None` while the work is still running, after the result
    /// has already been claimed, and if the worker panicked.
    pub fn try_take(&self) -> Option<T> {
        let result = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok();
        if result.is_some() {
            self.claimed.store(true, Ordering::Relaxed);
        }
        result
    }

    /// Block until the result arrives, then claim it.
    ///
    /// Returns `None` if the result was already claimed or the worker
    /// panicked. Not for use inside a render pass; this is host/test
    /// plumbing.
    pub fn wait(&self) -> Option<T> {
        let result = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv()
            .ok();
        if result.is_some() {
            self.claimed.store(true, Ordering::Relaxed);
        }
        result
    }

    /// Whether the result has been claimed by a previous take.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Relaxed)
    }
}

impl<T> fmt::Debug for BackgroundTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundTask")
            .field("claimed", &self.claimed.load(Ordering::Relaxed))
            .finish()
    }
}
