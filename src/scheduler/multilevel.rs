/*!
 * Multilevel-Queue Policy
 * Three strict-priority FIFO tiers with per-tier quanta
 */

use super::bookkeeping;
use super::traits::SchedulingPolicy;
use super::types::{CompletionRecord, PolicyKind, Tier};
use crate::core::limits::{DEFAULT_BURST, HIGH_TIER_QUANTUM, LOW_TIER_QUANTUM, MEDIUM_TIER_QUANTUM};
use crate::core::types::{Pid, Tick};
use crate::process::{ProcessDescriptor, ProcessState, ProcessTable, SchedulingMetadata};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Multilevel queue scheduler
///
/// The tier is chosen from priority at first admission and never revisited.
/// High always drains before Medium, Medium before Low; lower tiers can
/// starve under sustained High load.
#[derive(Debug, Clone)]
pub struct MultilevelQueue {
    high: VecDeque<Pid>,
    medium: VecDeque<Pid>,
    low: VecDeque<Pid>,
    high_quantum: u32,
    medium_quantum: u32,
    low_quantum: u32,
    default_burst: u32,
    running: Option<(Pid, Tier)>,
    completed: Vec<CompletionRecord>,
}

impl MultilevelQueue {
    pub fn new(high: u32, medium: u32, low: u32) -> Self {
        Self::with_default_burst(high, medium, low, DEFAULT_BURST)
    }

    pub fn with_default_burst(high: u32, medium: u32, low: u32, default_burst: u32) -> Self {
        Self {
            high: VecDeque::new(),
            medium: VecDeque::new(),
            low: VecDeque::new(),
            high_quantum: high.max(1),
            medium_quantum: medium.max(1),
            low_quantum: low.max(1),
            default_burst: default_burst.max(1),
            running: None,
            completed: Vec::new(),
        }
    }

    pub const fn quantum_for(&self, tier: Tier) -> u32 {
        match tier {
            Tier::High => self.high_quantum,
            Tier::Medium => self.medium_quantum,
            Tier::Low => self.low_quantum,
        }
    }

    fn queue(&self, tier: Tier) -> &VecDeque<Pid> {
        match tier {
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Low => &self.low,
        }
    }

    fn queue_mut(&mut self, tier: Tier) -> &mut VecDeque<Pid> {
        match tier {
            Tier::High => &mut self.high,
            Tier::Medium => &mut self.medium,
            Tier::Low => &mut self.low,
        }
    }

    /// Tier a queued or running pid sits in
    pub fn tier_of(&self, pid: Pid) -> Option<Tier> {
        if let Some((running, tier)) = self.running {
            if running == pid {
                return Some(tier);
            }
        }
        Tier::DISPATCH_ORDER
            .into_iter()
            .find(|&tier| self.queue(tier).contains(&pid))
    }

    /// Queued pids of one tier, front first
    pub fn tier_queue(&self, tier: Tier) -> Vec<Pid> {
        self.queue(tier).iter().copied().collect()
    }

    /// Whether the slice is spent while execution time remains
    pub fn needs_preemption(&self, meta: &SchedulingMetadata) -> bool {
        meta.quantum_remaining == 0 && meta.remaining > 0
    }

    fn tier_for(process: &ProcessDescriptor) -> Tier {
        process
            .scheduling
            .as_ref()
            .and_then(|m| m.tier)
            .unwrap_or_else(|| Tier::from_priority(process.priority))
    }
}

impl Default for MultilevelQueue {
    fn default() -> Self {
        Self::new(HIGH_TIER_QUANTUM, MEDIUM_TIER_QUANTUM, LOW_TIER_QUANTUM)
    }
}

impl SchedulingPolicy for MultilevelQueue {
    fn admit(&mut self, process: &mut ProcessDescriptor, now: Tick) {
        let tier = Self::tier_for(process);
        bookkeeping::initialize(
            process,
            now,
            self.default_burst,
            self.quantum_for(tier),
            Some(tier),
        );

        let pid = process.pid;
        if matches!(self.running, Some((running, _)) if running == pid) {
            self.running = None;
        }
        let queue = self.queue_mut(tier);
        if !queue.contains(&pid) {
            queue.push_back(pid);
        }
        process.state = ProcessState::Ready;
        debug!(pid, tier = %tier, "Admitted to multilevel queue");
    }

    fn select_next(&mut self, table: &mut ProcessTable, now: Tick) -> Option<Pid> {
        if let Some((previous, tier)) = self.running.take() {
            if let Some(process) = table.get_mut(previous) {
                match process.remaining() {
                    Some(remaining) if remaining > 0 => {
                        process.state = ProcessState::Ready;
                        self.queue_mut(tier).push_back(previous);
                    }
                    _ => self.notify_finished(process, now),
                }
            }
        }

        for tier in Tier::DISPATCH_ORDER {
            while let Some(pid) = self.queue_mut(tier).pop_front() {
                let Some(process) = table.get_mut(pid) else {
                    warn!(pid, tier = %tier, "Dropping unknown pid from multilevel queue");
                    continue;
                };
                process.state = ProcessState::Running;
                self.running = Some((pid, tier));
                debug!(pid, tier = %tier, "Multilevel dispatch");
                return Some(pid);
            }
        }
        None
    }

    fn withdraw(&mut self, pid: Pid) -> bool {
        if matches!(self.running, Some((running, _)) if running == pid) {
            self.running = None;
            return true;
        }
        for tier in Tier::DISPATCH_ORDER {
            let queue = self.queue_mut(tier);
            if let Some(pos) = queue.iter().position(|&p| p == pid) {
                queue.remove(pos);
                return true;
            }
        }
        false
    }

    fn notify_finished(&mut self, process: &mut ProcessDescriptor, now: Tick) {
        if matches!(self.running, Some((running, _)) if running == process.pid) {
            self.running = None;
        }
        bookkeeping::finish(process, now, &mut self.completed);
    }

    fn describe(&self) -> String {
        format!(
            "Multilevel Queue (High={}, Medium={}, Low={})",
            self.high_quantum, self.medium_quantum, self.low_quantum
        )
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::MultilevelQueue
    }

    fn time_slice(&self, meta: &SchedulingMetadata) -> u32 {
        self.quantum_for(meta.tier.unwrap_or(Tier::Low))
    }

    fn expire_quantum(&self, meta: &mut SchedulingMetadata) -> bool {
        meta.quantum_remaining = meta.quantum_remaining.saturating_sub(1);
        if self.needs_preemption(meta) {
            meta.quantum_remaining = self.time_slice(meta);
            true
        } else {
            false
        }
    }

    fn completions(&self) -> &[CompletionRecord] {
        &self.completed
    }

    fn queued(&self) -> Vec<Pid> {
        Tier::DISPATCH_ORDER
            .into_iter()
            .flat_map(|tier| self.queue(tier).iter().copied())
            .collect()
    }

    fn running(&self) -> Option<Pid> {
        self.running.map(|(pid, _)| pid)
    }
}
