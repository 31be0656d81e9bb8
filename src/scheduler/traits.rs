/*!
 * Scheduling Policy Trait
 * Interface every ready-queue policy implements
 */

use super::types::{CompletionRecord, PolicyKind};
use crate::core::types::{Pid, Tick};
use crate::process::{ProcessDescriptor, ProcessTable, SchedulingMetadata};

/// Ready-queue policy
///
/// Implementations own queue bookkeeping and per-process scheduling metadata
/// only. They never touch memory, devices, or semaphores.
pub trait SchedulingPolicy: Send + std::fmt::Debug {
    /// Enqueue a process, initializing its metadata on first admission
    ///
    /// Marks the process READY.
    fn admit(&mut self, process: &mut ProcessDescriptor, now: Tick);

    /// Settle the previously running process and dispatch the next one
    ///
    /// A previous runner with time left goes to the tail of its queue; one
    /// with none left is finished. The returned process is marked RUNNING.
    fn select_next(&mut self, table: &mut ProcessTable, now: Tick) -> Option<Pid>;

    /// Remove a process for good, discarding its scheduling metadata
    fn evict(&mut self, process: &mut ProcessDescriptor) {
        self.withdraw(process.pid);
        process.scheduling = None;
    }

    /// Remove a process from the queues or running slot, keeping its metadata
    ///
    /// Returns false if the policy was not tracking the process.
    fn withdraw(&mut self, pid: Pid) -> bool;

    /// Mark the process TERMINATED and record its completion
    fn notify_finished(&mut self, process: &mut ProcessDescriptor, now: Tick);

    /// Human-readable name including the quantum configuration
    fn describe(&self) -> String;

    fn kind(&self) -> PolicyKind;

    /// Full time slice owed to this process on dispatch
    fn time_slice(&self, meta: &SchedulingMetadata) -> u32;

    /// Consume one unit of quantum
    ///
    /// Returns true when the slice ran out with execution time left; the
    /// quantum has then already been reset and the caller must requeue.
    fn expire_quantum(&self, meta: &mut SchedulingMetadata) -> bool {
        meta.quantum_remaining = meta.quantum_remaining.saturating_sub(1);
        if meta.quantum_remaining == 0 && meta.remaining > 0 {
            meta.quantum_remaining = self.time_slice(meta);
            true
        } else {
            false
        }
    }

    /// Completed processes, in finish order
    fn completions(&self) -> &[CompletionRecord];

    /// Queued pids in dispatch order
    fn queued(&self) -> Vec<Pid>;

    /// Pid the policy believes is on the CPU
    fn running(&self) -> Option<Pid>;
}
