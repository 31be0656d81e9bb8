/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Simulated time, in ticks since the engine was created
pub type Tick = u64;

/// Priority level (0-9, higher is more important)
pub type Priority = u8;

/// Physical frame index
pub type FrameNumber = usize;

/// Page index within a process's address space
pub type PageNumber = usize;

/// Size type for memory accounting (kilobytes)
pub type Kilobytes = usize;

/// Size type for memory demands (megabytes)
pub type Megabytes = usize;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimulationError>;
