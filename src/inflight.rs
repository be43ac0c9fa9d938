//! Tracking of devices with a command in flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::device::DeviceId;
use crate::dispatch::Action;

/// Set of devices whose retry loop is still running.
///
/// Cloning yields another handle to the same set. A device is claimed
/// atomically before its task is spawned and released when the returned
/// [`InFlightGuard`] is dropped, so a panicking or failing task can never
/// leave its device locked.
///
/// # Example
///
/// ```
/// use kaku_lights_rs::{Action, DeviceId, InFlightRegistry};
///
/// let registry = InFlightRegistry::new();
/// let guard = registry.try_claim(DeviceId(1), Action::TurnOn).unwrap();
/// assert!(registry.try_claim(DeviceId(1), Action::TurnOff).is_none());
///
/// drop(guard);
/// assert!(registry.try_claim(DeviceId(1), Action::TurnOff).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    devices: Arc<Mutex<HashSet<DeviceId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `device` as busy with `action`.
    ///
    /// Returns `None` if a command for the device, of any kind, is already in
    /// flight.
    pub fn try_claim(&self, device: DeviceId, action: Action) -> Option<InFlightGuard> {
        if !self.lock().insert(device) {
            return None;
        }
        debug!("Claimed device {} for {}", device, action);
        Some(InFlightGuard {
            registry: self.clone(),
            device,
            action,
        })
    }

    pub fn contains(&self, device: DeviceId) -> bool {
        self.lock().contains(&device)
    }

    /// Devices currently in flight.
    pub fn in_flight(&self) -> Vec<DeviceId> {
        let mut devices: Vec<DeviceId> = self.lock().iter().copied().collect();
        devices.sort();
        devices
    }

    // The set stays consistent even if a holder panicked, since every
    // critical section is a single insert or remove.
    fn lock(&self) -> MutexGuard<'_, HashSet<DeviceId>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marker for one running retry loop.
///
/// Releases the device when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    device: DeviceId,
    action: Action,
}

impl InFlightGuard {
    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.device);
        debug!("Released device {} after {}", self.device, self.action);
    }
}
