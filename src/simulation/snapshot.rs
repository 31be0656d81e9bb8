/*!
 * Engine Snapshots
 * Read-only views of queues, memory, semaphores, devices, and history
 */

use super::{SimulationEngine, Transition};
use crate::core::sync::SemaphoreSnapshot;
use crate::core::types::{Pid, Tick};
use crate::memory::{FrameMapping, MemoryStats};
use crate::process::{DeviceToken, ProcessDescriptor, ProcessState};
use crate::scheduler::SchedulingReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Point-in-time view of the whole engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub run_id: Uuid,
    pub tick: Tick,
    pub paused: bool,
    pub policy: String,
    pub running: Option<Pid>,
    pub new: Vec<Pid>,
    pub ready: Vec<Pid>,
    pub blocked: Vec<Pid>,
    pub suspended: Vec<Pid>,
    pub terminated: Vec<Pid>,
    pub memory: MemoryStats,
    pub memory_map: Vec<FrameMapping>,
    pub semaphores: Vec<SemaphoreSnapshot>,
    pub devices: Vec<DeviceToken>,
}

impl SimulationEngine {
    pub fn process(&self, pid: Pid) -> Option<&ProcessDescriptor> {
        self.table.get(pid)
    }

    pub fn running_process(&self) -> Option<&ProcessDescriptor> {
        self.running.and_then(|pid| self.table.get(pid))
    }

    /// Pids in a state, in the order the engine visits them
    ///
    /// BLOCKED lists device waiters before semaphore waiters.
    pub fn pids_in(&self, state: ProcessState) -> Vec<Pid> {
        match state {
            ProcessState::New => self.new_set.clone(),
            ProcessState::Ready => self.ready.clone(),
            ProcessState::Running => self.running.into_iter().collect(),
            ProcessState::Blocked => self
                .blocked
                .iter()
                .chain(self.sem_blocked.iter())
                .copied()
                .collect(),
            ProcessState::Suspended => self.suspended.clone(),
            ProcessState::Terminated => self
                .table
                .iter()
                .filter(|p| p.is_terminated())
                .map(|p| p.pid)
                .collect(),
        }
    }

    pub fn processes_in(&self, state: ProcessState) -> Vec<&ProcessDescriptor> {
        self.pids_in(state)
            .into_iter()
            .filter_map(|pid| self.table.get(pid))
            .collect()
    }

    /// Every process in pid order
    pub fn processes(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.table.iter()
    }

    /// Ready queue as the policy will dispatch it
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.policy.queued()
    }

    pub fn policy_name(&self) -> String {
        self.policy.describe()
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.gate.memory().stats()
    }

    pub fn memory_map(&self) -> Vec<FrameMapping> {
        self.gate.memory().memory_map()
    }

    pub fn semaphores(&self) -> Vec<SemaphoreSnapshot> {
        self.gate.semaphores()
    }

    pub fn devices(&self) -> Vec<DeviceToken> {
        self.gate.devices()
    }

    pub fn report(&self) -> SchedulingReport {
        SchedulingReport::new(self.policy.describe(), self.policy.completions().to_vec())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transitions_for(&self, pid: Pid) -> Vec<Transition> {
        self.transitions
            .iter()
            .filter(|t| t.pid == pid)
            .copied()
            .collect()
    }

    /// True once every registered process has terminated
    pub fn all_terminated(&self) -> bool {
        self.table.iter().all(|p| p.is_terminated())
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            run_id: self.run_id,
            tick: self.time,
            paused: self.paused,
            policy: self.policy.describe(),
            running: self.running,
            new: self.pids_in(ProcessState::New),
            ready: self.pids_in(ProcessState::Ready),
            blocked: self.pids_in(ProcessState::Blocked),
            suspended: self.pids_in(ProcessState::Suspended),
            terminated: self.pids_in(ProcessState::Terminated),
            memory: self.memory_stats(),
            memory_map: self.memory_map(),
            semaphores: self.semaphores(),
            devices: self.devices(),
        }
    }
}
