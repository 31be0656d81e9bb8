/*!
 * Counting Semaphore
 *
 * Cooperative counting semaphore with a FIFO wait list. Nothing here ever
 * parks a thread: `wait` only reports whether the caller must be treated as
 * blocked, and `signal` hands back the process that should be woken.
 */

use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Result of a wait operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOutcome {
    /// The value stayed non-negative; the caller keeps running
    Proceeded,
    /// The caller was appended to the wait list
    Blocked,
}

impl WaitOutcome {
    #[inline(always)]
    pub fn is_blocked(&self) -> bool {
        matches!(self, WaitOutcome::Blocked)
    }
}

/// Counting semaphore
///
/// A negative value is the number of blocked waiters.
#[derive(Debug, Clone)]
pub struct Semaphore {
    name: String,
    initial: i64,
    value: i64,
    waiters: VecDeque<Pid>,
    waits: u64,
    signals: u64,
}

impl Semaphore {
    pub fn new(name: impl Into<String>, initial: i64) -> Self {
        let name = name.into();
        debug!(semaphore = %name, initial, "Semaphore created");
        Self {
            name,
            initial,
            value: initial,
            waiters: VecDeque::new(),
            waits: 0,
            signals: 0,
        }
    }

    /// Decrement; enqueue the caller if the value went negative
    pub fn wait(&mut self, pid: Pid) -> WaitOutcome {
        self.waits += 1;
        self.value -= 1;
        if self.value < 0 {
            self.waiters.push_back(pid);
            debug!(semaphore = %self.name, pid, value = self.value, "Process blocked on semaphore");
            WaitOutcome::Blocked
        } else {
            WaitOutcome::Proceeded
        }
    }

    /// Increment; pop the oldest waiter if one is still owed a wake-up
    pub fn signal(&mut self) -> Option<Pid> {
        self.signals += 1;
        self.value += 1;
        if self.value <= 0 {
            if let Some(pid) = self.waiters.pop_front() {
                debug!(semaphore = %self.name, pid, value = self.value, "Process released from semaphore");
                return Some(pid);
            }
        }
        None
    }

    /// Drop a waiter without signalling (used when the waiter is terminated)
    ///
    /// The value is bumped back so that `value == -waiting` keeps holding.
    pub fn cancel(&mut self, pid: Pid) -> bool {
        match self.waiters.iter().position(|&p| p == pid) {
            Some(pos) => {
                self.waiters.remove(pos);
                self.value += 1;
                self.waits -= 1;
                true
            }
            None => false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn initial_value(&self) -> i64 {
        self.initial
    }

    pub fn is_waiting(&self, pid: Pid) -> bool {
        self.waiters.contains(&pid)
    }

    pub fn waiting(&self) -> Vec<Pid> {
        self.waiters.iter().copied().collect()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiters.len()
    }

    /// Total (waits, signals) applied so far
    pub fn counters(&self) -> (u64, u64) {
        (self.waits, self.signals)
    }

    pub fn snapshot(&self) -> SemaphoreSnapshot {
        SemaphoreSnapshot {
            name: self.name.clone(),
            value: self.value,
            waiting: self.waiting(),
        }
    }
}

/// Read-only view of a semaphore for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreSnapshot {
    pub name: String,
    pub value: i64,
    pub waiting: Vec<Pid>,
}

impl std::fmt::Display for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Semaphore '{}': value={}, waiting={}",
            self.name,
            self.value,
            self.waiters.len()
        )
    }
}
