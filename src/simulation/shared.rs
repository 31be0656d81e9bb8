/*!
 * Shared Simulation Handle
 * Serializes every engine operation behind one exclusive lock
 */

use super::{SimulationEngine, SimulationSnapshot};
use crate::core::sync::WaitOutcome;
use crate::core::types::{Pid, SimResult, Tick};
use crate::process::ProcessSpec;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe engine handle
///
/// The engine has no internal locking; this wrapper provides the single
/// exclusive section all callers go through.
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<SimulationEngine>>,
}

impl SharedSimulation {
    pub fn new(engine: SimulationEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a closure with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut SimulationEngine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }

    pub fn tick(&self) -> bool {
        self.inner.lock().tick()
    }

    pub fn spawn(&self, spec: ProcessSpec) -> SimResult<Pid> {
        self.inner.lock().spawn(spec)
    }

    pub fn toggle_pause(&self) -> bool {
        self.inner.lock().toggle_pause()
    }

    pub fn current_time(&self) -> Tick {
        self.inner.lock().current_time()
    }

    pub fn suspend_process(&self, pid: Pid) -> SimResult<()> {
        self.inner.lock().suspend_process(pid)
    }

    pub fn resume_process(&self, pid: Pid) -> SimResult<()> {
        self.inner.lock().resume_process(pid)
    }

    pub fn terminate_process(&self, pid: Pid, reason: &str) -> SimResult<()> {
        self.inner.lock().terminate_process(pid, reason)
    }

    pub fn semaphore_wait(&self, pid: Pid, name: &str) -> SimResult<WaitOutcome> {
        self.inner.lock().semaphore_wait(pid, name)
    }

    pub fn semaphore_signal(&self, name: &str) -> SimResult<Option<Pid>> {
        self.inner.lock().semaphore_signal(name)
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn all_terminated(&self) -> bool {
        self.inner.lock().all_terminated()
    }
}

impl From<SimulationEngine> for SharedSimulation {
    fn from(engine: SimulationEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_spawns_get_distinct_pids() {
        let shared = SharedSimulation::new(SimulationEngine::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sim = shared.clone();
                thread::spawn(move || sim.spawn(ProcessSpec::new(1, 0)).unwrap())
            })
            .collect();

        let mut pids: Vec<Pid> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 2, 3, 4]);
        assert_eq!(shared.with(|e| e.processes().count()), 4);
    }

    #[test]
    fn test_tick_through_handle() {
        let shared = SharedSimulation::new(SimulationEngine::default());
        shared.spawn(ProcessSpec::new(5, 1).with_burst(1)).unwrap();
        shared.tick();
        shared.tick();
        assert!(shared.all_terminated());
        assert_eq!(shared.current_time(), 2);
    }
}
