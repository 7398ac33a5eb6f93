//! Debounced, supersedable background tasks
//!
//! A [`Debouncer`] runs a task after a quiet period. Every call to
//! [`Debouncer::schedule`] or [`Debouncer::cancel`] bumps a generation
//! counter; a task holds a [`Ticket`] for the generation it was scheduled in
//! and must check [`Ticket::is_current`] before publishing anything. That
//! check is what discards stale responses; aborting the timer is only a
//! resource optimization.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Proof of which generation a task belongs to
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl Ticket {
    /// True until a newer schedule or a cancel supersedes this ticket
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

/// Timer plus generation counter
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<Pending>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a new generation without scheduling anything
    ///
    /// Aborts a timer that has not fired yet. A task already past its timer
    /// keeps running but its ticket is no longer current.
    pub fn cancel(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_unfired();
        Ticket {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Run `task` after the quiet period unless superseded first
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(&self, task: F) -> Ticket
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.cancel();
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));

        let task_ticket = ticket.clone();
        let task_fired = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task_fired.store(true, Ordering::SeqCst);
            if task_ticket.is_current() {
                task(task_ticket).await;
            }
        });

        *self.lock_pending() = Some(Pending { handle, fired });
        ticket
    }

    /// True while a scheduled task has not finished
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// Current generation number
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn abort_unfired(&self) {
        if let Some(pending) = self.lock_pending().take() {
            if !pending.fired.load(Ordering::SeqCst) {
                pending.handle.abort();
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_unfired();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
