/*!
 * Process Control
 * Suspend, resume, terminate, and semaphore operations outside the tick phases
 */

use super::SimulationEngine;
use crate::core::sync::WaitOutcome;
use crate::core::types::{Pid, SimResult};
use crate::core::SimulationError;
use crate::process::ProcessState;
use tracing::{info, warn};

impl SimulationEngine {
    /// Take a READY, RUNNING, or BLOCKED process out of circulation
    ///
    /// Nothing it holds is released. A semaphore wait is cancelled, so
    /// resume always lands in READY.
    pub fn suspend_process(&mut self, pid: Pid) -> SimResult<()> {
        let state = self.table.lookup(pid)?.state;
        match state {
            ProcessState::Ready | ProcessState::Running | ProcessState::Blocked => {}
            _ => return Err(SimulationError::invalid_state(pid, state, "suspend")),
        }

        self.detach(pid);
        self.policy.withdraw(pid);
        if let Some(semaphore) = self.gate.cancel_wait(pid) {
            info!(pid, semaphore = %semaphore, "Semaphore wait cancelled by suspend");
        }
        if let Some(process) = self.table.get_mut(pid) {
            process.state = ProcessState::Suspended;
        }
        self.suspended.push(pid);
        self.record(pid, state, ProcessState::Suspended);
        info!(pid, from = %state, "Process suspended");
        Ok(())
    }

    /// Return a SUSPENDED process to READY
    ///
    /// Any other state is reported as `NotSuspended` and left untouched.
    pub fn resume_process(&mut self, pid: Pid) -> SimResult<()> {
        let state = self.table.lookup(pid)?.state;
        if state != ProcessState::Suspended {
            return Err(SimulationError::NotSuspended { pid, state });
        }

        self.suspended.retain(|&p| p != pid);
        let now = self.time;
        if let Some(process) = self.table.get_mut(pid) {
            self.policy.admit(process, now);
        }
        self.ready.push(pid);
        self.record(pid, ProcessState::Suspended, ProcessState::Ready);
        info!(pid, "Process resumed");
        Ok(())
    }

    /// Kill a process from any live state, releasing everything it holds
    pub fn terminate_process(&mut self, pid: Pid, reason: &str) -> SimResult<()> {
        let state = self.table.lookup(pid)?.state;
        if state.is_terminated() {
            return Err(SimulationError::invalid_state(pid, state, "terminate"));
        }

        self.detach(pid);
        self.gate.cancel_wait(pid);
        if let Some(process) = self.table.get_mut(pid) {
            self.policy.evict(process);
            let released = self.gate.release_resources(process);
            process.state = ProcessState::Terminated;
            info!(
                pid,
                reason,
                frames_freed = released.frames_freed,
                devices_released = released.devices_released,
                "Process terminated"
            );
        }
        self.record(pid, state, ProcessState::Terminated);
        self.journal
            .log_at(self.time, format!("Process {} terminated: {}", pid, reason));
        Ok(())
    }

    // =========================================================================
    // Semaphores
    // =========================================================================

    /// Wait on a named semaphore on behalf of a READY or RUNNING process
    ///
    /// `Blocked` moves the process to BLOCKED until a matching signal.
    pub fn semaphore_wait(&mut self, pid: Pid, name: &str) -> SimResult<WaitOutcome> {
        let state = self.table.lookup(pid)?.state;
        if self.gate.semaphore(name).is_none() {
            return Err(SimulationError::SemaphoreNotFound(name.to_string()));
        }
        if let Some(current) = self.gate.waiting_on(pid) {
            return Err(SimulationError::AlreadyWaiting {
                pid,
                semaphore: current.to_string(),
            });
        }
        if !matches!(state, ProcessState::Ready | ProcessState::Running) {
            return Err(SimulationError::invalid_state(pid, state, "wait on semaphore"));
        }

        let outcome = self.gate.acquire_semaphore(pid, name)?;
        if outcome.is_blocked() {
            self.detach(pid);
            self.policy.withdraw(pid);
            if let Some(process) = self.table.get_mut(pid) {
                process.state = ProcessState::Blocked;
            }
            self.sem_blocked.push(pid);
            self.record(pid, state, ProcessState::Blocked);
        }
        info!(pid, semaphore = name, outcome = ?outcome, "Semaphore wait");
        Ok(outcome)
    }

    /// Signal a named semaphore; a woken waiter becomes READY
    pub fn semaphore_signal(&mut self, name: &str) -> SimResult<Option<Pid>> {
        let woken = self.gate.release_semaphore(name)?;
        let Some(pid) = woken else {
            info!(semaphore = name, "Semaphore signalled, no waiter");
            return Ok(None);
        };

        if !self.sem_blocked.contains(&pid) {
            warn!(pid, semaphore = name, "Woken pid was not semaphore-blocked");
            return Ok(Some(pid));
        }
        self.sem_blocked.retain(|&p| p != pid);
        let now = self.time;
        if let Some(process) = self.table.get_mut(pid) {
            self.policy.admit(process, now);
        }
        self.ready.push(pid);
        self.record(pid, ProcessState::Blocked, ProcessState::Ready);
        info!(pid, semaphore = name, "Semaphore signalled, waiter woken");
        Ok(Some(pid))
    }

    /// Create (or replace) a named semaphore
    pub fn create_semaphore(&mut self, name: impl Into<String>, initial: i64) {
        let name = name.into();
        self.journal.log_at(
            self.time,
            format!("Semaphore {} created with value {}", name, initial),
        );
        self.gate.create_semaphore(name, initial);
    }
}
