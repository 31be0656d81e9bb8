/*!
 * Process Registry
 * Owns every process descriptor and mints process IDs
 */

use super::types::{ProcessDescriptor, ProcessSpec, ProcessState};
use crate::core::id::PidAllocator;
use crate::core::types::{Pid, SimResult, Tick};
use crate::core::SimulationError;
use std::collections::BTreeMap;
use tracing::debug;

/// Process table
///
/// Descriptors are kept in PID order, which is also creation order.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, ProcessDescriptor>,
    ids: PidAllocator,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table drawing IDs from an injected allocator
    pub fn with_allocator(ids: PidAllocator) -> Self {
        Self {
            processes: BTreeMap::new(),
            ids,
        }
    }

    /// Register a new descriptor in state NEW and return its PID
    pub fn insert(&mut self, spec: ProcessSpec, now: Tick) -> Pid {
        let pid = self.ids.next();
        let descriptor = ProcessDescriptor::new(pid, spec, now);
        debug!(pid, priority = descriptor.priority, memory_mb = descriptor.memory_mb, "Process registered");
        self.processes.insert(pid, descriptor);
        pid
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessDescriptor> {
        self.processes.get(&pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessDescriptor> {
        self.processes.get_mut(&pid)
    }

    /// Lookup that reports unknown PIDs as an error
    pub fn lookup(&self, pid: Pid) -> SimResult<&ProcessDescriptor> {
        self.get(pid).ok_or(SimulationError::ProcessNotFound(pid))
    }

    pub fn lookup_mut(&mut self, pid: Pid) -> SimResult<&mut ProcessDescriptor> {
        self.get_mut(pid).ok_or(SimulationError::ProcessNotFound(pid))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn state_of(&self, pid: Pid) -> Option<ProcessState> {
        self.get(pid).map(|p| p.state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.processes.values()
    }

    /// Processes that have not terminated
    pub fn active(&self) -> Vec<&ProcessDescriptor> {
        self.iter().filter(|p| !p.is_terminated()).collect()
    }

    pub fn is_active(&self, pid: Pid) -> bool {
        self.get(pid).map_or(false, |p| !p.is_terminated())
    }

    /// Drop terminated descriptors; returns how many were removed
    ///
    /// Purged PIDs are not handed out again.
    pub fn purge_terminated(&mut self) -> usize {
        let before = self.processes.len();
        self.processes.retain(|_, p| !p.is_terminated());
        let purged = before - self.processes.len();
        if purged > 0 {
            debug!(purged, "Purged terminated processes");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// The PID the next insert will receive
    pub fn next_pid(&self) -> Pid {
        self.ids.peek()
    }
}
