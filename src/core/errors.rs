/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::Pid;
use crate::process::ProcessState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

/// Simulation errors with serialization support
///
/// None of these are fatal: every failure is local to one request and leaves
/// the engine in the state it was in before the call.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(simulation::process_not_found),
        help("The process may have been purged or never existed. Check PID validity.")
    )]
    ProcessNotFound(Pid),

    #[error("Process {pid} is not suspended (current state: {state})")]
    #[diagnostic(
        code(simulation::not_suspended),
        help("Only SUSPENDED processes can be resumed.")
    )]
    NotSuspended { pid: Pid, state: ProcessState },

    #[error("Cannot {operation} process {pid} in state {state}")]
    #[diagnostic(
        code(simulation::invalid_state),
        help("Operation cannot be performed in the current process state.")
    )]
    InvalidState {
        pid: Pid,
        state: ProcessState,
        operation: String,
    },

    #[error("Unknown I/O device: {0}")]
    #[diagnostic(
        code(simulation::unknown_device),
        help("Register the device in the simulation configuration before using it.")
    )]
    UnknownDevice(String),

    #[error("Semaphore '{0}' not found")]
    #[diagnostic(
        code(simulation::semaphore_not_found),
        help("Create the semaphore first or use one of the defaults (CPU, IO).")
    )]
    SemaphoreNotFound(String),

    #[error("Process {pid} is already waiting on semaphore '{semaphore}'")]
    #[diagnostic(
        code(simulation::already_waiting),
        help("A process can wait on at most one semaphore at a time.")
    )]
    AlreadyWaiting { pid: Pid, semaphore: String },

    #[error("Memory error: {0}")]
    #[diagnostic(
        code(simulation::memory),
        help("Release memory held by other processes or lower the demand.")
    )]
    Memory(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(simulation::invalid_config),
        help("Review configuration parameters.")
    )]
    InvalidConfig(String),
}

impl SimulationError {
    pub(crate) fn invalid_state(pid: Pid, state: ProcessState, operation: &str) -> Self {
        SimulationError::InvalidState {
            pid,
            state,
            operation: operation.to_string(),
        }
    }
}

// Allow conversion from MemoryError to SimulationError
impl From<MemoryError> for SimulationError {
    fn from(err: MemoryError) -> Self {
        SimulationError::Memory(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimulationError::NotSuspended {
            pid: 3,
            state: ProcessState::Ready,
        };
        assert_eq!(
            err.to_string(),
            "Process 3 is not suspended (current state: READY)"
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = SimulationError::ProcessNotFound(42);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("process_not_found"));
        let back: SimulationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_memory_error_conversion() {
        let err: SimulationError = MemoryError::AlreadyAllocated(7).into();
        assert!(matches!(err, SimulationError::Memory(_)));
    }
}
