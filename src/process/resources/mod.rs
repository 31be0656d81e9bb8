/*!
 * Resource Gate
 * Single admission checkpoint for memory, CPU tokens, devices, and semaphores
 */

mod devices;

pub use devices::{DeviceDenial, DeviceRegistry, DeviceToken};

use super::types::{ProcessDescriptor, ResourceHandle};
use crate::core::config::SimulationConfig;
use crate::core::limits::{CPU_SEMAPHORE, DEFAULT_SEMAPHORE_VALUE, IO_SEMAPHORE};
use crate::core::sync::{Semaphore, SemaphoreSnapshot, WaitOutcome};
use crate::core::types::{Pid, SimResult};
use crate::core::SimulationError;
use crate::memory::MemoryManager;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What a release call actually gave back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseStats {
    pub frames_freed: usize,
    pub devices_released: usize,
    pub handles_cleared: usize,
}

impl ReleaseStats {
    pub fn is_empty(&self) -> bool {
        self.frames_freed == 0 && self.devices_released == 0 && self.handles_cleared == 0
    }
}

/// Resource gate
///
/// Composes the page allocator, named semaphores, and named device tokens.
#[derive(Debug, Clone)]
pub struct ResourceGate {
    memory: MemoryManager,
    semaphores: BTreeMap<String, Semaphore>,
    devices: DeviceRegistry,
}

impl ResourceGate {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut gate = Self::from_parts(
            MemoryManager::from_config(&config.memory),
            config
                .semaphores
                .iter()
                .map(|(name, initial)| Semaphore::new(name.clone(), *initial)),
            DeviceRegistry::new(config.devices.iter().cloned()),
        );
        // CPU and IO always exist, even when the configuration lists only its own
        for name in [CPU_SEMAPHORE, IO_SEMAPHORE] {
            gate.semaphores
                .entry(name.to_string())
                .or_insert_with(|| Semaphore::new(name, DEFAULT_SEMAPHORE_VALUE));
        }
        info!(
            total_kb = gate.memory.info().0,
            semaphores = gate.semaphores.len(),
            devices = gate.devices.iter().count(),
            "Resource gate initialized"
        );
        gate
    }

    pub fn from_parts<I>(memory: MemoryManager, semaphores: I, devices: DeviceRegistry) -> Self
    where
        I: IntoIterator<Item = Semaphore>,
    {
        Self {
            memory,
            semaphores: semaphores
                .into_iter()
                .map(|s| (s.name().to_string(), s))
                .collect(),
            devices,
        }
    }

    // =========================================================================
    // Memory + CPU token
    // =========================================================================

    /// Allocate memory and attach a process-scoped CPU token
    ///
    /// Returns the number of pages granted. On failure nothing changes.
    pub fn try_request_resources(&mut self, process: &mut ProcessDescriptor) -> SimResult<usize> {
        let pid = process.pid;
        let pages = self.memory.allocate(pid, process.memory_kb())?;
        process.resources.push(ResourceHandle::Cpu(format!("CPU-{}", pid)));
        info!(pid, memory_mb = process.memory_mb, pages, "Resources assigned");
        Ok(pages)
    }

    /// Admission check: false (and no change) when memory is short
    pub fn request_resources(&mut self, process: &mut ProcessDescriptor) -> bool {
        if self.memory.has_allocation(process.pid) {
            warn!(pid = process.pid, "Resource request for already admitted process");
            return false;
        }
        match self.try_request_resources(process) {
            Ok(_) => true,
            Err(err) => {
                debug!(pid = process.pid, error = %err, "Resource request denied");
                false
            }
        }
    }

    /// Release memory, return held devices, and clear every handle
    ///
    /// Safe to call repeatedly; later calls find nothing to release.
    pub fn release_resources(&mut self, process: &mut ProcessDescriptor) -> ReleaseStats {
        let pid = process.pid;
        let frames_freed = self.memory.release(pid);

        let mut devices_released = 0;
        for device in process.held_devices() {
            if self.devices.release(&device, pid) {
                devices_released += 1;
            }
        }

        let handles_cleared = process.resources.len();
        process.resources.clear();

        let stats = ReleaseStats {
            frames_freed,
            devices_released,
            handles_cleared,
        };
        if !stats.is_empty() {
            info!(pid, frames_freed, devices_released, "Resources released");
        }
        stats
    }

    // =========================================================================
    // I/O devices
    // =========================================================================

    /// Give the named device to the process; false if busy or unknown
    pub fn request_io_device(&mut self, process: &mut ProcessDescriptor, device: &str) -> bool {
        match self.devices.acquire(device, process.pid) {
            Ok(()) => {
                let handle = ResourceHandle::Device(device.to_string());
                if !process.holds(&handle) {
                    process.resources.push(handle);
                }
                true
            }
            Err(DeviceDenial::Busy(holder)) => {
                debug!(pid = process.pid, device, holder, "Device busy");
                false
            }
            Err(DeviceDenial::Unknown) => {
                warn!(pid = process.pid, device, "Request for unknown device");
                false
            }
        }
    }

    /// Return the named device; false if the process did not hold it
    pub fn release_io_device(&mut self, process: &mut ProcessDescriptor, device: &str) -> bool {
        let released = self.devices.release(device, process.pid);
        let handle = ResourceHandle::Device(device.to_string());
        process.resources.retain(|r| r != &handle);
        released
    }

    pub fn has_device(&self, device: &str) -> bool {
        self.devices.contains(device)
    }

    pub fn register_device(&mut self, device: impl Into<String>) -> bool {
        self.devices.register(device)
    }

    pub fn devices(&self) -> Vec<DeviceToken> {
        self.devices.snapshot()
    }

    // =========================================================================
    // Semaphores
    // =========================================================================

    /// Create (or replace) a named semaphore
    pub fn create_semaphore(&mut self, name: impl Into<String>, initial: i64) {
        let name = name.into();
        if self.semaphores.contains_key(&name) {
            warn!(semaphore = %name, "Replacing existing semaphore");
        }
        self.semaphores
            .insert(name.clone(), Semaphore::new(name, initial));
    }

    pub fn acquire_semaphore(&mut self, pid: Pid, name: &str) -> SimResult<WaitOutcome> {
        let semaphore = self
            .semaphores
            .get_mut(name)
            .ok_or_else(|| SimulationError::SemaphoreNotFound(name.to_string()))?;
        Ok(semaphore.wait(pid))
    }

    pub fn release_semaphore(&mut self, name: &str) -> SimResult<Option<Pid>> {
        let semaphore = self
            .semaphores
            .get_mut(name)
            .ok_or_else(|| SimulationError::SemaphoreNotFound(name.to_string()))?;
        Ok(semaphore.signal())
    }

    /// Name of the semaphore the process is queued on, if any
    pub fn waiting_on(&self, pid: Pid) -> Option<&str> {
        self.semaphores
            .values()
            .find(|s| s.is_waiting(pid))
            .map(|s| s.name())
    }

    /// Pull the process out of whichever wait list holds it
    pub fn cancel_wait(&mut self, pid: Pid) -> Option<String> {
        self.semaphores
            .values_mut()
            .find(|s| s.is_waiting(pid))
            .and_then(|s| s.cancel(pid).then(|| s.name().to_string()))
    }

    pub fn semaphore(&self, name: &str) -> Option<&Semaphore> {
        self.semaphores.get(name)
    }

    pub fn semaphores(&self) -> Vec<SemaphoreSnapshot> {
        self.semaphores.values().map(Semaphore::snapshot).collect()
    }

    // =========================================================================
    // Memory reporting
    // =========================================================================

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }
}

impl Default for ResourceGate {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
