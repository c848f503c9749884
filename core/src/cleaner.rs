//! cleaner.rs
//! Deferred cleanup registry.
//!
//! Each facade registers the teardown of its native session here and keeps
//! the returned `Cleanable`. The action runs at most once: either when
//! `clean()` is called or when the `Cleanable` is dropped.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::debug;

type Action = Box<dyn FnOnce() + Send>;

static GLOBAL_CLEANER: OnceLock<Cleaner> = OnceLock::new();

#[derive(Default)]
struct Registry {
    actions: Mutex<HashMap<u64, Action>>,
    next_id: AtomicU64,
}

impl Registry {
    fn actions(&self) -> MutexGuard<'_, HashMap<u64, Action>> {
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, id: u64) -> Option<Action> {
        self.actions().remove(&id)
    }
}

#[derive(Clone, Default)]
pub struct Cleaner {
    registry: Arc<Registry>,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every facade in the process.
    pub fn global() -> &'static Cleaner {
        GLOBAL_CLEANER.get_or_init(Cleaner::new)
    }

    pub fn register<F>(&self, action: F) -> Cleanable
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.actions().insert(id, Box::new(action));
        debug!("[CLEANER] registered #{id}");
        Cleanable { id, registry: Arc::clone(&self.registry) }
    }

    /// Registrations that have not fired yet.
    pub fn pending(&self) -> usize {
        self.registry.actions().len()
    }
}

/// Ticket for one registered action.
pub struct Cleanable {
    id: u64,
    registry: Arc<Registry>,
}

impl Cleanable {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_pending(&self) -> bool {
        self.registry.actions().contains_key(&self.id)
    }

    /// Run the action now. Returns `false` if it already ran.
    pub fn clean(&self) -> bool {
        // Removed under the lock, run outside it.
        match self.registry.take(self.id) {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

impl Drop for Cleanable {
    fn drop(&mut self) {
        if self.clean() {
            debug!("[CLEANER] #{} fired on drop", self.id);
        }
    }
}
