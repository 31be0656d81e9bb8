/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::types::{Kilobytes, Pid};

/// Page allocator interface
pub trait PageAllocator {
    /// Grant enough pages to cover `demand_kb`; all-or-nothing
    fn allocate(&mut self, pid: Pid, demand_kb: Kilobytes) -> MemoryResult<usize>;

    /// Unbind every frame owned by `pid`; returns the number of frames freed
    fn release(&mut self, pid: Pid) -> usize;

    /// Pages currently granted to a process
    fn pages_of(&self, pid: Pid) -> Vec<Page>;

    /// Pages needed for a demand, without allocating
    fn pages_needed(&self, demand_kb: Kilobytes) -> usize;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available) in KB
    fn info(&self) -> (Kilobytes, Kilobytes, Kilobytes);

    /// Frame-by-frame ownership
    fn memory_map(&self) -> Vec<FrameMapping>;

    /// Get memory held by a specific process (KB)
    fn process_memory(&self, pid: Pid) -> Kilobytes;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
