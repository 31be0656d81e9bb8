/*!
 * System Limits and Constants
 *
 * Centralized location for the simulator's sizes, quanta, and thresholds.
 * Organized by domain for discoverability.
 */

use super::types::{Kilobytes, Priority};

// =============================================================================
// MEMORY
// =============================================================================

/// Number of physical frames in the default pool
pub const DEFAULT_FRAME_COUNT: usize = 16;

/// Size of one frame (and one page) in KB
pub const DEFAULT_FRAME_SIZE_KB: Kilobytes = 256;

/// Conversion factor for process memory demands
pub const KB_PER_MB: Kilobytes = 1024;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Round-robin quantum when none is configured
pub const DEFAULT_RR_QUANTUM: u32 = 4;

/// Execution burst assigned on first admission when the process brings none
pub const DEFAULT_BURST: u32 = 5;

/// Multilevel-queue time slice for the High tier
pub const HIGH_TIER_QUANTUM: u32 = 2;

/// Multilevel-queue time slice for the Medium tier
pub const MEDIUM_TIER_QUANTUM: u32 = 4;

/// Multilevel-queue time slice for the Low tier
pub const LOW_TIER_QUANTUM: u32 = 6;

/// Priorities at or above this land in the High tier
pub const HIGH_TIER_THRESHOLD: Priority = 7;

/// Priorities at or above this (and below High) land in the Medium tier
pub const MEDIUM_TIER_THRESHOLD: Priority = 4;

/// Highest accepted priority; larger values are clamped
pub const MAX_PRIORITY: Priority = 9;

// =============================================================================
// RESOURCES
// =============================================================================

/// I/O devices registered by default
pub const DEFAULT_DEVICES: [&str; 3] = ["disk", "printer", "network"];

/// Semaphore guarding the CPU
pub const CPU_SEMAPHORE: &str = "CPU";

/// Semaphore guarding I/O
pub const IO_SEMAPHORE: &str = "IO";

/// Initial value of the default semaphores
pub const DEFAULT_SEMAPHORE_VALUE: i64 = 1;

// =============================================================================
// DRIVER
// =============================================================================

/// Wall-clock interval between ticks in the headless driver
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Upper bound on ticks the headless driver will run
pub const DEFAULT_MAX_TICKS: u64 = 1_000;
