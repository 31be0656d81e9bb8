/*!
 * Round-Robin Policy
 * Single FIFO ready queue with a fixed time quantum
 */

use super::bookkeeping;
use super::traits::SchedulingPolicy;
use super::types::{CompletionRecord, PolicyKind};
use crate::core::limits::DEFAULT_BURST;
use crate::core::types::{Pid, Tick};
use crate::process::{ProcessDescriptor, ProcessState, ProcessTable, SchedulingMetadata};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Round-robin scheduler
///
/// Strict arrival order; priority plays no part.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    queue: VecDeque<Pid>,
    quantum: u32,
    default_burst: u32,
    running: Option<Pid>,
    completed: Vec<CompletionRecord>,
}

impl RoundRobin {
    pub fn new(quantum: u32) -> Self {
        Self::with_default_burst(quantum, DEFAULT_BURST)
    }

    pub fn with_default_burst(quantum: u32, default_burst: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            quantum: quantum.max(1),
            default_burst: default_burst.max(1),
            running: None,
            completed: Vec::new(),
        }
    }

    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl SchedulingPolicy for RoundRobin {
    fn admit(&mut self, process: &mut ProcessDescriptor, now: Tick) {
        bookkeeping::initialize(process, now, self.default_burst, self.quantum, None);

        let pid = process.pid;
        if self.running == Some(pid) {
            self.running = None;
        }
        if !self.queue.contains(&pid) {
            self.queue.push_back(pid);
        }
        process.state = ProcessState::Ready;
        debug!(pid, queued = self.queue.len(), "Admitted to round-robin queue");
    }

    fn select_next(&mut self, table: &mut ProcessTable, now: Tick) -> Option<Pid> {
        if let Some(previous) = self.running.take() {
            if let Some(process) = table.get_mut(previous) {
                match process.remaining() {
                    Some(remaining) if remaining > 0 => {
                        process.state = ProcessState::Ready;
                        self.queue.push_back(previous);
                    }
                    _ => self.notify_finished(process, now),
                }
            }
        }

        while let Some(pid) = self.queue.pop_front() {
            let Some(process) = table.get_mut(pid) else {
                warn!(pid, "Dropping unknown pid from round-robin queue");
                continue;
            };
            process.state = ProcessState::Running;
            self.running = Some(pid);
            debug!(pid, "Round-robin dispatch");
            return Some(pid);
        }
        None
    }

    fn withdraw(&mut self, pid: Pid) -> bool {
        if self.running == Some(pid) {
            self.running = None;
            return true;
        }
        match self.queue.iter().position(|&p| p == pid) {
            Some(pos) => {
                self.queue.remove(pos);
                true
            }
            None => false,
        }
    }

    fn notify_finished(&mut self, process: &mut ProcessDescriptor, now: Tick) {
        if self.running == Some(process.pid) {
            self.running = None;
        }
        bookkeeping::finish(process, now, &mut self.completed);
    }

    fn describe(&self) -> String {
        format!("Round Robin (quantum={})", self.quantum)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::RoundRobin
    }

    fn time_slice(&self, _meta: &SchedulingMetadata) -> u32 {
        self.quantum
    }

    fn completions(&self) -> &[CompletionRecord] {
        &self.completed
    }

    fn queued(&self) -> Vec<Pid> {
        self.queue.iter().copied().collect()
    }

    fn running(&self) -> Option<Pid> {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn table_with(n: usize) -> (ProcessTable, Vec<Pid>) {
        let mut table = ProcessTable::new();
        let pids = (0..n)
            .map(|_| table.insert(ProcessSpec::new(5, 1), 0))
            .collect();
        (table, pids)
    }

    fn admit_all(rr: &mut RoundRobin, table: &mut ProcessTable, pids: &[Pid]) {
        for &pid in pids {
            rr.admit(table.get_mut(pid).unwrap(), 0);
        }
    }

    #[test]
    fn test_admit_initializes_metadata_once() {
        let (mut table, pids) = table_with(1);
        let mut rr = RoundRobin::new(3);
        let p = table.get_mut(pids[0]).unwrap();
        rr.admit(p, 7);

        let meta = p.scheduling.clone().unwrap();
        assert_eq!(meta.arrival, 7);
        assert_eq!(meta.burst, DEFAULT_BURST);
        assert_eq!(meta.quantum_remaining, 3);
        assert_eq!(p.state, ProcessState::Ready);

        p.scheduling.as_mut().unwrap().remaining = 2;
        rr.withdraw(p.pid);
        rr.admit(p, 9);
        assert_eq!(p.scheduling.as_ref().unwrap().arrival, 7);
        assert_eq!(p.remaining(), Some(2));
    }

    #[test]
    fn test_fifo_dispatch() {
        let (mut table, pids) = table_with(3);
        let mut rr = RoundRobin::new(2);
        admit_all(&mut rr, &mut table, &pids);

        assert_eq!(rr.select_next(&mut table, 1), Some(pids[0]));
        assert_eq!(table.state_of(pids[0]), Some(ProcessState::Running));
        assert_eq!(rr.queued(), vec![pids[1], pids[2]]);
    }

    #[test]
    fn test_select_requeues_unfinished_runner() {
        let (mut table, pids) = table_with(2);
        let mut rr = RoundRobin::new(2);
        admit_all(&mut rr, &mut table, &pids);

        rr.select_next(&mut table, 1);
        assert_eq!(rr.select_next(&mut table, 2), Some(pids[1]));
        assert_eq!(rr.queued(), vec![pids[0]]);
        assert_eq!(table.state_of(pids[0]), Some(ProcessState::Ready));
    }

    #[test]
    fn test_select_finishes_exhausted_runner() {
        let (mut table, pids) = table_with(1);
        let mut rr = RoundRobin::new(2);
        admit_all(&mut rr, &mut table, &pids);
        rr.select_next(&mut table, 1);
        table
            .get_mut(pids[0])
            .unwrap()
            .scheduling
            .as_mut()
            .unwrap()
            .remaining = 0;

        assert_eq!(rr.select_next(&mut table, 6), None);
        assert_eq!(table.state_of(pids[0]), Some(ProcessState::Terminated));
        assert_eq!(rr.completions().len(), 1);
        assert_eq!(rr.completions()[0].finish, 6);
    }

    #[test]
    fn test_admit_never_duplicates() {
        let (mut table, pids) = table_with(1);
        let mut rr = RoundRobin::new(2);
        admit_all(&mut rr, &mut table, &pids);
        admit_all(&mut rr, &mut table, &pids);
        assert_eq!(rr.len(), 1);
    }

    #[test]
    fn test_evict_purges_metadata() {
        let (mut table, pids) = table_with(2);
        let mut rr = RoundRobin::new(2);
        admit_all(&mut rr, &mut table, &pids);

        let p = table.get_mut(pids[1]).unwrap();
        rr.evict(p);
        assert!(p.scheduling.is_none());
        assert_eq!(rr.queued(), vec![pids[0]]);
        assert!(!rr.withdraw(pids[1]));
    }

    #[test]
    fn test_quantum_expiry_resets() {
        let rr = RoundRobin::new(2);
        let mut meta = SchedulingMetadata::new(0, 5, 2);
        meta.remaining = 4;
        assert!(!rr.expire_quantum(&mut meta));
        meta.remaining = 3;
        assert!(rr.expire_quantum(&mut meta));
        assert_eq!(meta.quantum_remaining, 2);

        meta.quantum_remaining = 1;
        meta.remaining = 0;
        assert!(!rr.expire_quantum(&mut meta));
    }

    #[test]
    fn test_describe() {
        assert_eq!(RoundRobin::new(4).describe(), "Round Robin (quantum=4)");
    }
}
