//! Keyed trailing-edge debouncing on top of tokio timers.
//!
//! Each key holds at most one pending task. Scheduling under a key that is
//! already pending aborts the earlier task and restarts the quiet period, so
//! a burst of calls runs only the closure passed last.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct DebounceState {
    pending: HashMap<String, Pending>,
    next_generation: u64,
    torn_down: bool,
}

/// Coalesces rapid calls per key into a single delayed invocation.
#[derive(Default)]
pub struct DebounceController {
    state: Arc<Mutex<DebounceState>>,
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DebounceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` once `delay` has passed without another `schedule` for
    /// `key`. Returns `false` when nothing was scheduled: after teardown or
    /// outside a tokio runtime.
    pub fn schedule<F>(&self, key: impl Into<String>, task: F, delay: Duration) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        let Ok(runtime) = Handle::try_current() else {
            log::error!("Cannot debounce {key:?} outside of a tokio runtime");
            return false;
        };

        // The lock is held until the entry is stored so the spawned task
        // cannot observe the map before its own generation is in it.
        let mut state = lock(&self.state);
        if state.torn_down {
            log::debug!("Ignoring debounce of {key:?} after teardown");
            return false;
        }

        state.next_generation += 1;
        let generation = state.next_generation;
        if let Some(previous) = state.pending.remove(&key) {
            previous.handle.abort();
        }

        let shared = Arc::clone(&self.state);
        let task_key = key.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = lock(&shared);
                match state.pending.get(&task_key) {
                    Some(pending) if pending.generation == generation => {
                        state.pending.remove(&task_key);
                    }
                    _ => return,
                }
            }
            task();
        });

        state.pending.insert(key, Pending { generation, handle });
        true
    }

    /// Drops the pending invocation for `key` without running it.
    pub fn cancel(&self, key: &str) -> bool {
        match lock(&self.state).pending.remove(key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.state).pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn is_torn_down(&self) -> bool {
        lock(&self.state).torn_down
    }

    /// Cancels everything pending; later `schedule` calls are ignored.
    pub fn teardown(&self) {
        let mut state = lock(&self.state);
        state.torn_down = true;
        for (key, pending) in state.pending.drain() {
            log::debug!("Cancelling pending {key:?} on teardown");
            pending.handle.abort();
        }
    }
}

impl Drop for DebounceController {
    fn drop(&mut self) {
        self.teardown();
    }
}
