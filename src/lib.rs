/*!
 * OS Simulation Kernel Library
 * Discrete-time process, scheduling, memory, and synchronization simulator
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::sync::{Semaphore, SemaphoreSnapshot, WaitOutcome};
pub use crate::core::{
    MemoryConfig, Pid, PidAllocator, PolicyConfig, Priority, SimResult, SimulationConfig,
    SimulationError, Tick,
};
pub use memory::{FrameMapping, MemoryError, MemoryManager, MemoryStats};
pub use monitoring::{init_tracing, Journal, JournalEntry};
pub use process::{
    DeviceToken, IoBurst, ProcessDescriptor, ProcessSpec, ProcessState, ProcessTable,
    ResourceGate,
};
pub use scheduler::{
    CompletionRecord, MultilevelQueue, PolicyKind, RoundRobin, SchedulingPolicy,
    SchedulingReport, Tier,
};
pub use simulation::{
    SharedSimulation, SimulationBuilder, SimulationEngine, SimulationSnapshot, Transition,
};
