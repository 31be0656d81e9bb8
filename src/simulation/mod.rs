/*!
 * Simulation Engine
 *
 * Orchestrates the per-tick process state machine. Ordering decisions are
 * delegated to the scheduling policy; memory, device, and semaphore checks
 * to the resource gate.
 */

mod builder;
mod control;
mod phases;
mod shared;
mod snapshot;

pub use builder::SimulationBuilder;
pub use shared::SharedSimulation;
pub use snapshot::SimulationSnapshot;

use crate::core::config::SimulationConfig;
use crate::core::types::{Pid, Priority, SimResult, Tick};
use crate::core::{Megabytes, SimulationError};
use crate::monitoring::Journal;
use crate::process::{IoBurst, ProcessSpec, ProcessState, ProcessTable, ResourceGate};
use crate::scheduler::{build_policy, SchedulingPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// One recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub tick: Tick,
    pub pid: Pid,
    pub from: ProcessState,
    pub to: ProcessState,
}

/// Discrete-time process simulator
///
/// Every process sits in exactly one of the state sets below, matching its
/// descriptor state. Terminated processes live only in the table.
#[derive(Debug)]
pub struct SimulationEngine {
    table: ProcessTable,
    policy: Box<dyn SchedulingPolicy>,
    gate: ResourceGate,

    running: Option<Pid>,
    new_set: Vec<Pid>,
    ready: Vec<Pid>,
    /// Waiting on an I/O device; advanced by the I/O phase
    blocked: Vec<Pid>,
    /// Waiting on a semaphore; only a signal wakes these
    sem_blocked: Vec<Pid>,
    suspended: Vec<Pid>,

    time: Tick,
    paused: bool,
    transitions: Vec<Transition>,
    journal: Journal,
    run_id: Uuid,
}

impl SimulationEngine {
    /// Engine with the given configuration and a private journal
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::builder().with_config(config).build()
    }

    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    pub(crate) fn from_parts(config: &SimulationConfig, journal: Journal) -> Self {
        let run_id = Uuid::new_v4();
        let policy = build_policy(&config.policy, config.default_burst);
        let gate = ResourceGate::new(config);

        info!(
            run_id = %run_id,
            policy = %policy.describe(),
            frames = config.memory.frame_count,
            frame_size_kb = config.memory.frame_size_kb,
            "Simulation engine created"
        );
        journal.log_at(0, format!("Simulation started with {}", policy.describe()));

        Self {
            table: ProcessTable::new(),
            policy,
            gate,
            running: None,
            new_set: Vec::new(),
            ready: Vec::new(),
            blocked: Vec::new(),
            sem_blocked: Vec::new(),
            suspended: Vec::new(),
            time: 0,
            paused: false,
            transitions: Vec::new(),
            journal,
            run_id,
        }
    }

    // =========================================================================
    // Process creation
    // =========================================================================

    /// Register a process in state NEW; it is admitted on a later tick
    pub fn add_process(
        &mut self,
        priority: Priority,
        memory_mb: Megabytes,
        io_bursts: Vec<IoBurst>,
    ) -> SimResult<Pid> {
        self.spawn(ProcessSpec::new(priority, memory_mb).with_io_bursts(io_bursts))
    }

    /// Register a process from a `ProcessSpec`
    ///
    /// Fails with `UnknownDevice` before minting a pid if any I/O burst names
    /// a device the gate does not know.
    pub fn spawn(&mut self, spec: ProcessSpec) -> SimResult<Pid> {
        if let Some(burst) = spec
            .io_bursts
            .iter()
            .find(|b| !self.gate.has_device(&b.device))
        {
            return Err(SimulationError::UnknownDevice(burst.device.clone()));
        }

        let pid = self.table.insert(spec, self.time);
        self.new_set.push(pid);

        if let Some(process) = self.table.get(pid) {
            info!(
                pid,
                priority = process.priority,
                memory_mb = process.memory_mb,
                io_bursts = process.io_bursts.len(),
                "Process created"
            );
            self.journal.log_at(
                self.time,
                format!(
                    "Process {} created (priority {}, {} MB)",
                    pid, process.priority, process.memory_mb
                ),
            );
        }
        Ok(pid)
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!(paused = self.paused, tick = self.time, "Simulation pause toggled");
        self.journal.log_at(
            self.time,
            if self.paused {
                "Simulation paused"
            } else {
                "Simulation resumed"
            },
        );
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_time(&self) -> Tick {
        self.time
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    // =========================================================================
    // Internal bookkeeping
    // =========================================================================

    /// Append a transition and mirror it to the journal
    fn record(&mut self, pid: Pid, from: ProcessState, to: ProcessState) {
        if from == to {
            return;
        }
        debug!(pid, tick = self.time, from = %from, to = %to, "State transition");
        self.transitions.push(Transition {
            tick: self.time,
            pid,
            from,
            to,
        });
        self.journal
            .log_at(self.time, format!("Process {}: {} -> {}", pid, from, to));
    }

    /// Remove a pid from every non-terminal state set
    fn detach(&mut self, pid: Pid) {
        if self.running == Some(pid) {
            self.running = None;
        }
        for set in [
            &mut self.new_set,
            &mut self.ready,
            &mut self.blocked,
            &mut self.sem_blocked,
            &mut self.suspended,
        ] {
            set.retain(|&p| p != pid);
        }
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::from_parts(&SimulationConfig::default(), Journal::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_process_starts_new() {
        let mut engine = SimulationEngine::default();
        let pid = engine.add_process(5, 1, vec![]).unwrap();
        assert_eq!(engine.process(pid).unwrap().state, ProcessState::New);
        assert_eq!(engine.pids_in(ProcessState::New), vec![pid]);
    }

    #[test]
    fn test_unknown_device_rejected_before_pid() {
        let mut engine = SimulationEngine::default();
        let err = engine
            .add_process(5, 1, vec![IoBurst::new("tape", 2)])
            .unwrap_err();
        assert_eq!(err, SimulationError::UnknownDevice("tape".into()));
        let pid = engine.add_process(5, 1, vec![]).unwrap();
        assert_eq!(pid, 1);
    }

    #[test]
    fn test_pause_makes_tick_noop() {
        let mut engine = SimulationEngine::default();
        engine.add_process(5, 1, vec![]).unwrap();
        assert!(engine.toggle_pause());
        assert!(!engine.tick());
        assert_eq!(engine.current_time(), 0);
        assert_eq!(engine.pids_in(ProcessState::New).len(), 1);

        assert!(!engine.toggle_pause());
        assert!(engine.tick());
        assert_eq!(engine.current_time(), 1);
    }

    #[test]
    fn test_journal_records_creation() {
        let mut engine = SimulationEngine::default();
        engine.add_process(5, 1, vec![]).unwrap();
        assert!(engine.journal().contains("Process 1 created"));
    }
}
