/*!
 * Tick Phases
 * Admission, execution, I/O completion, and dispatch, in that order
 */

use super::SimulationEngine;
use crate::core::types::Pid;
use crate::monitoring::TickSpan;
use crate::process::{ProcessState, ResourceHandle};
use tracing::{debug, warn};

/// What the execution phase did to the running process
enum Execution {
    Idle,
    Finished(Pid),
    Continued {
        pid: Pid,
        requeued: bool,
        blocked: bool,
    },
}

impl SimulationEngine {
    /// Advance simulated time by one unit
    ///
    /// Returns false, doing nothing, while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            debug!(tick = self.time, "Tick skipped while paused");
            return false;
        }

        self.time += 1;
        let span = TickSpan::new(&self.run_id, self.time);
        let _entered = span.enter();

        span.record_admitted(self.admission_phase());
        span.record_blocked(self.execution_phase());
        span.record_unblocked(self.io_phase());
        span.record_dispatched(self.dispatch_phase());
        true
    }

    /// Admit NEW processes in arrival order while memory allows
    ///
    /// A process that does not fit stays NEW and does not hold back later,
    /// smaller ones.
    fn admission_phase(&mut self) -> usize {
        let now = self.time;
        let pending = std::mem::take(&mut self.new_set);
        let mut admitted = Vec::new();

        for pid in pending {
            let Some(process) = self.table.get_mut(pid) else {
                continue;
            };
            if self.gate.request_resources(process) {
                self.policy.admit(process, now);
                self.ready.push(pid);
                admitted.push(pid);
            } else {
                debug!(pid, tick = now, "Admission deferred: insufficient memory");
                self.new_set.push(pid);
            }
        }

        for &pid in &admitted {
            self.record(pid, ProcessState::New, ProcessState::Ready);
        }
        admitted.len()
    }

    /// Run the current process for one unit
    ///
    /// Returns true when the process left the CPU for an I/O device.
    fn execution_phase(&mut self) -> bool {
        match self.execute_running() {
            Execution::Idle => false,
            Execution::Finished(pid) => {
                self.record(pid, ProcessState::Running, ProcessState::Terminated);
                false
            }
            Execution::Continued {
                pid,
                requeued,
                blocked,
            } => {
                let mut state = ProcessState::Running;
                if requeued {
                    self.record(pid, state, ProcessState::Ready);
                    state = ProcessState::Ready;
                }
                if blocked {
                    self.record(pid, state, ProcessState::Blocked);
                }
                blocked
            }
        }
    }

    fn execute_running(&mut self) -> Execution {
        let Some(pid) = self.running else {
            return Execution::Idle;
        };
        let now = self.time;

        let Some(process) = self.table.get_mut(pid) else {
            warn!(pid, "Running pid missing from process table");
            self.running = None;
            return Execution::Idle;
        };
        // A process resumed mid-burst still holds its device and goes straight
        // back to waiting on it without using CPU.
        let resumes_io = process
            .current_io()
            .is_some_and(|b| process.holds(&ResourceHandle::Device(b.device.clone())));

        let mut requeued = false;
        if !resumes_io {
            let Some(meta) = process.scheduling.as_mut() else {
                warn!(pid, "Running process has no scheduling metadata");
                self.running = None;
                return Execution::Idle;
            };

            meta.remaining = meta.remaining.saturating_sub(1);
            if meta.remaining == 0 {
                self.gate.release_resources(process);
                self.policy.notify_finished(process, now);
                self.running = None;
                return Execution::Finished(pid);
            }

            requeued = self.policy.expire_quantum(meta);
            if requeued {
                debug!(pid, tick = now, "Quantum expired");
                self.policy.admit(process, now);
                self.running = None;
                self.ready.push(pid);
            }
        }

        // Retry the pending device every time the process runs; a busy device
        // leaves the burst in place.
        let mut blocked = false;
        if let Some(device) = process.current_io().map(|b| b.device.clone()) {
            if self.gate.request_io_device(process, &device) {
                self.policy.withdraw(pid);
                process.state = ProcessState::Blocked;
                self.running = None;
                self.ready.retain(|&p| p != pid);
                self.blocked.push(pid);
                blocked = true;
                debug!(pid, device = %device, "Blocked on I/O");
            }
        }

        Execution::Continued {
            pid,
            requeued,
            blocked,
        }
    }

    /// Advance every device wait by one unit; finished ones become READY
    fn io_phase(&mut self) -> usize {
        let now = self.time;
        let waiting = std::mem::take(&mut self.blocked);
        let mut woken = Vec::new();

        for pid in waiting {
            let Some(process) = self.table.get_mut(pid) else {
                continue;
            };
            let complete = match process.current_io_mut() {
                Some(burst) => {
                    burst.advance();
                    burst.is_complete()
                }
                None => true,
            };
            if !complete {
                self.blocked.push(pid);
                continue;
            }

            if let Some(device) = process.current_io().map(|b| b.device.clone()) {
                self.gate.release_io_device(process, &device);
                debug!(pid, device = %device, "I/O burst complete");
            }
            process.complete_io();
            self.policy.admit(process, now);
            self.ready.push(pid);
            woken.push(pid);
        }

        for &pid in &woken {
            self.record(pid, ProcessState::Blocked, ProcessState::Ready);
        }
        woken.len()
    }

    /// Put the next process on an idle CPU
    fn dispatch_phase(&mut self) -> Option<Pid> {
        if self.running.is_some() {
            return None;
        }
        let now = self.time;

        // The policy settles its previous runner itself; mirror whatever it did.
        let previous = self
            .policy
            .running()
            .and_then(|pid| self.table.state_of(pid).map(|state| (pid, state)));

        let next = self.policy.select_next(&mut self.table, now);

        if let Some((pid, before)) = previous {
            self.settle_previous(pid, before);
        }

        let pid = next?;
        if let Some(meta) = self.table.get_mut(pid).and_then(|p| p.scheduling.as_mut()) {
            meta.quantum_remaining = self.policy.time_slice(meta);
        }
        self.ready.retain(|&p| p != pid);
        self.running = Some(pid);
        self.record(pid, ProcessState::Ready, ProcessState::Running);
        Some(pid)
    }

    fn settle_previous(&mut self, pid: Pid, before: ProcessState) {
        let Some(after) = self.table.state_of(pid) else {
            return;
        };
        match after {
            ProcessState::Ready if !self.ready.contains(&pid) => self.ready.push(pid),
            ProcessState::Terminated => {
                if let Some(process) = self.table.get_mut(pid) {
                    self.gate.release_resources(process);
                }
                self.detach(pid);
            }
            _ => {}
        }
        self.record(pid, before, after);
    }
}
