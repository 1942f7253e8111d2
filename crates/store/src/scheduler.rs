//! Coalescing flush scheduler
//!
//! Prevents a burst of writes from turning into a burst of disk writes.
//! The first write of a burst arms a one-shot timer; every later write
//! while the timer is pending is absorbed into the same flush. The delay
//! is measured from the first write and is never reset.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Scheduler state
#[derive(Debug, Default)]
pub enum FlushState {
    /// No flush pending
    #[default]
    Idle,
    /// A flush is armed and will run once its delay elapses
    Pending(JoinHandle<()>),
}

impl FlushState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FlushState::Pending(_))
    }
}

/// One-shot delayed flush with at most one timer armed at any instant
pub struct FlushScheduler {
    /// Quiescence delay
    delay: Duration,
    /// Runtime the timer tasks are spawned on
    runtime: Handle,
    /// Shared with the armed task so it can return to `Idle` when it fires
    state: Arc<Mutex<FlushState>>,
}

impl FlushScheduler {
    /// Create a scheduler that spawns its timers on `runtime`
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            state: Arc::new(Mutex::new(FlushState::Idle)),
        }
    }

    /// Whether a flush is currently armed
    pub fn is_pending(&self) -> bool {
        self.state.lock().is_pending()
    }

    /// Arm a flush unless one is already pending
    ///
    /// Returns `true` when this call armed a new timer. When the timer
    /// fires, the state returns to `Idle` *before* `flush` runs, so writes
    /// that land during the flush arm the next one. `flush` runs on the
    /// blocking pool; only the timer wait suspends the task.
    pub fn schedule<F>(&self, flush: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        if state.is_pending() {
            return false;
        }

        let shared = Arc::clone(&self.state);
        let delay = self.delay;

        // The state lock is held until `Pending` is stored, so the task
        // cannot observe `Idle` and race ahead of this assignment.
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            *shared.lock() = FlushState::Idle;
            if let Err(e) = tokio::task::spawn_blocking(flush).await {
                error!("Flush task panicked: {}", e);
            }
        });

        *state = FlushState::Pending(handle);
        debug!("Flush armed ({:?})", delay);
        true
    }
}
