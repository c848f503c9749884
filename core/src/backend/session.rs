//! backend/session.rs
//! A codec session: one native handle plus a validity flag.
//!
//! The handle lives in a shared slot so the cleanup registry can release it
//! without owning the session. Emptying the slot drops the handle, which is
//! what frees the native resource, so it can only ever happen once.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::types::{Result, ZipperError};

/// Releases a native resource if it is still held.
pub trait Teardown: Send + Sync {
    /// Returns whether anything was released.
    fn teardown(&self) -> bool;
}

pub struct NativeSlot<H> {
    label: &'static str,
    handle: Mutex<Option<H>>,
}

impl<H> NativeSlot<H> {
    fn lock(&self) -> MutexGuard<'_, Option<H>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_held(&self) -> bool {
        self.lock().is_some()
    }
}

impl<H: Send> Teardown for NativeSlot<H> {
    fn teardown(&self) -> bool {
        let taken = self.lock().take();
        match taken {
            Some(handle) => {
                drop(handle);
                debug!("[TEARDOWN] {} handle released", self.label);
                true
            }
            None => {
                trace!("[TEARDOWN] {} already released", self.label);
                false
            }
        }
    }
}

pub struct Session<H> {
    slot: Arc<NativeSlot<H>>,
    valid: bool,
}

impl<H: Send + 'static> Session<H> {
    pub fn open(label: &'static str, handle: H) -> Self {
        Self {
            slot: Arc::new(NativeSlot { label, handle: Mutex::new(Some(handle)) }),
            valid: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn ensure_valid(&self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(ZipperError::InvalidSession)
        }
    }

    /// Run `f` against the live handle.
    pub fn with_handle<R>(&self, f: impl FnOnce(&mut H) -> Result<R>) -> Result<R> {
        self.ensure_valid()?;
        let mut guard = self.slot.lock();
        match guard.as_mut() {
            Some(handle) => f(handle),
            None => Err(ZipperError::InvalidSession),
        }
    }

    /// Invalidate, then release the handle. A second call is rejected.
    pub fn end(&mut self) -> Result<()> {
        self.ensure_valid()?;
        self.valid = false;
        self.slot.teardown();
        Ok(())
    }

    /// Handle the cleanup registry keeps to release the resource later.
    pub fn teardown_handle(&self) -> Arc<dyn Teardown> {
        self.slot.clone()
    }

    pub fn is_released(&self) -> bool {
        !self.slot.is_held()
    }
}
