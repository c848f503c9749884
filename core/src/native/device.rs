//! native/device.rs
//! In-process model of the accelerator: a fixed pool of instances that
//! sessions attach to, started on first use and stopped when the last
//! session lets go.
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use log::{debug, info, trace, warn};

use crate::constants::{env_keys, DEFAULT_HW_INSTANCES};
use crate::utils::env_parse;

static GLOBAL_DEVICE: OnceLock<Arc<Device>> = OnceLock::new();

#[derive(Debug)]
pub struct Device {
    instances: usize,
    attached: AtomicUsize,
    open_sessions: AtomicUsize,
    hw_jobs: AtomicU64,
    sw_jobs: AtomicU64,
}

/// Point-in-time view of the device counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub instances: usize,
    pub attached: usize,
    pub open_sessions: usize,
    pub hw_jobs: u64,
    pub sw_jobs: u64,
}

impl Device {
    pub fn with_instances(instances: usize) -> Arc<Self> {
        Arc::new(Self {
            instances,
            attached: AtomicUsize::new(0),
            open_sessions: AtomicUsize::new(0),
            hw_jobs: AtomicU64::new(0),
            sw_jobs: AtomicU64::new(0),
        })
    }

    /// Process-wide device, sized from `QAT_ZIPPER_HW_INSTANCES` on first use.
    pub fn global() -> Arc<Device> {
        GLOBAL_DEVICE
            .get_or_init(|| {
                let instances = match env_parse::<usize>(env_keys::HW_INSTANCES) {
                    Ok(Some(n)) => n,
                    Ok(None) => DEFAULT_HW_INSTANCES,
                    Err(e) => {
                        warn!("[DEVICE] ignoring {e}, using {DEFAULT_HW_INSTANCES} instances");
                        DEFAULT_HW_INSTANCES
                    }
                };
                info!("[DEVICE] {instances} accelerator instance(s) available");
                Device::with_instances(instances)
            })
            .clone()
    }

    pub fn instances(&self) -> usize {
        self.instances
    }

    /// False models a host without any accelerator.
    pub fn has_hardware(&self) -> bool {
        self.instances > 0
    }

    pub fn in_use(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    pub fn is_started(&self) -> bool {
        self.open_sessions() > 0
    }

    pub fn stats(&self) -> DeviceStats {
        DeviceStats {
            instances: self.instances,
            attached: self.in_use(),
            open_sessions: self.open_sessions(),
            hw_jobs: self.hw_jobs.load(Ordering::Relaxed),
            sw_jobs: self.sw_jobs.load(Ordering::Relaxed),
        }
    }

    /// Reference-counted start. The device stops when the last lease drops.
    pub fn lease(self: &Arc<Self>) -> DeviceLease {
        if self.open_sessions.fetch_add(1, Ordering::SeqCst) == 0 {
            debug!("[DEVICE] started");
        }
        DeviceLease { device: Arc::clone(self) }
    }

    /// Claim a free instance, or `None` when the pool is exhausted.
    pub fn try_attach(self: &Arc<Self>) -> Option<InstanceGuard> {
        self.attached
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.instances).then_some(n + 1)
            })
            .ok()
            .map(|_| InstanceGuard { device: Arc::clone(self) })
    }

    /// One attempt plus `retry_count` retries, yielding between attempts.
    pub fn attach_with_retry(self: &Arc<Self>, retry_count: u32) -> Option<InstanceGuard> {
        for attempt in 0..=retry_count {
            if let Some(guard) = self.try_attach() {
                return Some(guard);
            }
            if attempt < retry_count {
                trace!("[RETRY] attach attempt {} of {} failed", attempt + 1, retry_count + 1);
                std::thread::yield_now();
            }
        }
        None
    }

    pub(crate) fn record_job(&self, on_hardware: bool) {
        let counter = if on_hardware { &self.hw_jobs } else { &self.sw_jobs };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Attached accelerator instance; returned to the pool on drop.
#[derive(Debug)]
pub struct InstanceGuard {
    device: Arc<Device>,
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        self.device.attached.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Keeps the device started while a session is open.
#[derive(Debug)]
pub struct DeviceLease {
    device: Arc<Device>,
}

impl DeviceLease {
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }
}

impl Drop for DeviceLease {
    fn drop(&mut self) {
        if self.device.open_sessions.fetch_sub(1, Ordering::SeqCst) == 1 {
            debug!("[DEVICE] stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_bounded_and_guards_return_instances() {
        let dev = Device::with_instances(2);
        let a = dev.try_attach();
        let b = dev.try_attach();
        assert!(a.is_some() && b.is_some());
        assert!(dev.try_attach().is_none());
        drop(a);
        assert_eq!(dev.in_use(), 1);
        assert!(dev.try_attach().is_some());
    }

    #[test]
    fn last_lease_stops_device() {
        let dev = Device::with_instances(1);
        let first = dev.lease();
        let second = dev.lease();
        drop(first);
        assert!(dev.is_started());
        drop(second);
        assert!(!dev.is_started());
    }

    #[test]
    fn retry_gives_up_after_all_attempts() {
        let dev = Device::with_instances(0);
        assert!(dev.attach_with_retry(3).is_none());
    }
}
