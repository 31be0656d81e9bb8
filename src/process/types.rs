/*!
 * Process Types
 * Process descriptor, I/O bursts, held resources, and scheduling metadata
 */

use crate::core::limits::{KB_PER_MB, MAX_PRIORITY};
use crate::core::types::{Kilobytes, Megabytes, Pid, Priority, Tick};
use crate::scheduler::Tier;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created, waiting for admission (memory)
    New,
    /// Admitted and queued in the scheduling policy
    Ready,
    /// Holding the simulated CPU
    Running,
    /// Waiting for an I/O device or a semaphore
    Blocked,
    /// Taken out of circulation by an explicit suspend
    Suspended,
    /// Finished or killed; immutable from here on
    Terminated,
}

impl ProcessState {
    pub const ALL: [ProcessState; 6] = [
        ProcessState::New,
        ProcessState::Ready,
        ProcessState::Running,
        ProcessState::Blocked,
        ProcessState::Suspended,
        ProcessState::Terminated,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::Suspended => "SUSPENDED",
            ProcessState::Terminated => "TERMINATED",
        }
    }

    #[inline(always)]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, ProcessState::Terminated)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device request: hold `device` for `duration` ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoBurst {
    pub device: String,
    pub duration: u32,
    pub remaining: u32,
}

impl IoBurst {
    pub fn new(device: impl Into<String>, duration: u32) -> Self {
        Self {
            device: device.into(),
            duration,
            remaining: duration,
        }
    }

    /// Consume one tick of device time
    pub fn advance(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Capability a process currently holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ResourceHandle {
    /// Process-scoped CPU token minted at admission ("CPU-<pid>")
    Cpu(String),
    /// Exclusive hold on a named I/O device
    Device(String),
}

/// Per-process scheduling bookkeeping
///
/// Created by the policy on first admission and owned by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingMetadata {
    pub arrival: Tick,
    pub burst: u32,
    pub remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    pub quantum_remaining: u32,
}

impl SchedulingMetadata {
    pub fn new(arrival: Tick, burst: u32, quantum: u32) -> Self {
        Self {
            arrival,
            burst,
            remaining: burst,
            tier: None,
            quantum_remaining: quantum,
        }
    }

    #[must_use]
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Ticks of CPU consumed so far
    pub fn executed(&self) -> u32 {
        self.burst - self.remaining
    }
}

/// Creation parameters for a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub priority: Priority,
    pub memory_mb: Megabytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,
    #[serde(default)]
    pub io_bursts: Vec<IoBurst>,
}

impl ProcessSpec {
    pub fn new(priority: Priority, memory_mb: Megabytes) -> Self {
        Self {
            priority,
            memory_mb,
            burst: None,
            io_bursts: Vec::new(),
        }
    }

    /// Total CPU ticks the process needs
    #[must_use]
    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst = Some(burst);
        self
    }

    /// Append an I/O burst
    #[must_use]
    pub fn with_io(mut self, device: impl Into<String>, duration: u32) -> Self {
        self.io_bursts.push(IoBurst::new(device, duration));
        self
    }

    #[must_use]
    pub fn with_io_bursts(mut self, bursts: Vec<IoBurst>) -> Self {
        self.io_bursts.extend(bursts);
        self
    }
}

/// Process descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub pid: Pid,
    pub state: ProcessState,
    pub priority: Priority,
    pub memory_mb: Megabytes,
    /// Requested execution burst; the policy picks a default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_burst: Option<u32>,
    pub io_bursts: Vec<IoBurst>,
    pub io_index: usize,
    pub resources: Vec<ResourceHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<SchedulingMetadata>,
    pub created_tick: Tick,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl ProcessDescriptor {
    pub fn new(pid: Pid, spec: ProcessSpec, now: Tick) -> Self {
        Self {
            pid,
            state: ProcessState::New,
            priority: spec.priority.min(MAX_PRIORITY),
            memory_mb: spec.memory_mb,
            requested_burst: spec.burst,
            io_bursts: spec.io_bursts,
            io_index: 0,
            resources: Vec::new(),
            scheduling: None,
            created_tick: now,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Memory demand in the allocator's unit
    ///
    /// Saturates, so an absurd demand simply never fits the pool.
    #[inline]
    pub fn memory_kb(&self) -> Kilobytes {
        self.memory_mb.saturating_mul(KB_PER_MB)
    }

    pub fn current_io(&self) -> Option<&IoBurst> {
        self.io_bursts.get(self.io_index)
    }

    pub fn current_io_mut(&mut self) -> Option<&mut IoBurst> {
        self.io_bursts.get_mut(self.io_index)
    }

    pub fn has_pending_io(&self) -> bool {
        self.io_index < self.io_bursts.len()
    }

    /// Move past the current I/O burst
    pub fn complete_io(&mut self) {
        if self.has_pending_io() {
            self.io_index += 1;
        }
    }

    /// Remaining execution time, if the policy has admitted the process
    pub fn remaining(&self) -> Option<u32> {
        self.scheduling.as_ref().map(|m| m.remaining)
    }

    pub fn holds(&self, handle: &ResourceHandle) -> bool {
        self.resources.contains(handle)
    }

    pub fn held_devices(&self) -> Vec<String> {
        self.resources
            .iter()
            .filter_map(|r| match r {
                ResourceHandle::Device(name) => Some(name.clone()),
                ResourceHandle::Cpu(_) => None,
            })
            .collect()
    }

    #[inline(always)]
    pub const fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }
}

impl fmt::Display for ProcessDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PID: {} | State: {} | Memory: {}MB | Priority: {}",
            self.pid, self.state, self.memory_mb, self.priority
        )?;
        if let Some(meta) = &self.scheduling {
            if let Some(tier) = meta.tier {
                write!(f, " | Queue: {}", tier)?;
            }
            write!(
                f,
                " | Burst: {} | Remaining: {} | Quantum: {}",
                meta.burst, meta.remaining, meta.quantum_remaining
            )?;
        }
        if !self.io_bursts.is_empty() {
            write!(f, " | IO: {}/{}", self.io_index, self.io_bursts.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_descriptor_defaults() {
        let spec = ProcessSpec::new(5, 2).with_io("disk", 3);
        let p = ProcessDescriptor::new(1, spec, 0);
        assert_eq!(p.state, ProcessState::New);
        assert_eq!(p.memory_kb(), 2048);
        assert!(p.has_pending_io());
        assert!(p.scheduling.is_none());
        assert!(p.resources.is_empty());
    }

    #[test]
    fn test_huge_memory_demand_saturates() {
        let p = ProcessDescriptor::new(1, ProcessSpec::new(5, usize::MAX / 512), 0);
        assert_eq!(p.memory_kb(), usize::MAX);
    }

    #[test]
    fn test_priority_clamped() {
        let p = ProcessDescriptor::new(1, ProcessSpec::new(42, 1), 0);
        assert_eq!(p.priority, MAX_PRIORITY);
    }

    #[test]
    fn test_io_burst_progression() {
        let spec = ProcessSpec::new(1, 1).with_io("disk", 2).with_io("printer", 1);
        let mut p = ProcessDescriptor::new(1, spec, 0);

        let burst = p.current_io_mut().unwrap();
        burst.advance();
        assert!(!burst.is_complete());
        burst.advance();
        assert!(burst.is_complete());
        burst.advance();
        assert_eq!(burst.remaining, 0);

        p.complete_io();
        assert_eq!(p.current_io().map(|b| b.device.as_str()), Some("printer"));
        p.complete_io();
        assert!(!p.has_pending_io());
        p.complete_io();
        assert_eq!(p.io_index, 2);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ProcessState::Suspended.to_string(), "SUSPENDED");
    }
}
