/*!
 * Memory Allocator Implementation
 * Page allocation and release logic
 */

use super::super::types::{MemoryError, MemoryPressure, MemoryResult, Page};
use super::MemoryManager;
use crate::core::types::{Kilobytes, Pid};
use tracing::{debug, info, warn};

impl MemoryManager {
    /// Pages needed to cover a demand (ceiling division)
    #[inline]
    pub fn pages_needed(&self, demand_kb: Kilobytes) -> usize {
        demand_kb.div_ceil(self.frame_size_kb)
    }

    /// Bind one page per free frame, first-fit by frame index
    ///
    /// Fails without binding anything when not enough frames are free.
    pub fn allocate(&mut self, pid: Pid, demand_kb: Kilobytes) -> MemoryResult<usize> {
        if self.process_pages.contains_key(&pid) {
            warn!(pid, "Rejected second allocation for process");
            return Err(MemoryError::AlreadyAllocated(pid));
        }

        let required = self.pages_needed(demand_kb);
        let available = self.free_frames();
        if available < required {
            info!(
                pid,
                required, available, "Not enough free frames, allocation deferred"
            );
            return Err(MemoryError::InsufficientFrames {
                pid,
                requested: required,
                available,
            });
        }

        let mut pages = Vec::with_capacity(required);
        for frame in self.frames.iter_mut().filter(|f| f.is_free()).take(required) {
            let page = Page::new(pid, pages.len());
            frame.bind(page);
            pages.push(page);
        }
        self.process_pages.insert(pid, pages);

        let stats = self.stats();
        match stats.memory_pressure() {
            MemoryPressure::High | MemoryPressure::Critical => warn!(
                pid,
                pages = required,
                usage = stats.usage_percentage,
                pressure = %stats.memory_pressure(),
                "Memory pressure after allocation"
            ),
            _ => info!(
                pid,
                pages = required,
                free_frames = stats.free_frames,
                "Allocated pages"
            ),
        }

        Ok(required)
    }

    /// Unbind every frame owned by the process; idempotent
    pub fn release(&mut self, pid: Pid) -> usize {
        let Some(pages) = self.process_pages.remove(&pid) else {
            debug!(pid, "Release requested for process without pages");
            return 0;
        };

        let mut freed = 0;
        for frame in self.frames.iter_mut() {
            if frame.owner() == Some(pid) {
                frame.release();
                freed += 1;
            }
        }

        if freed != pages.len() {
            warn!(
                pid,
                recorded = pages.len(),
                freed,
                "Frame table disagreed with page record"
            );
        }
        info!(pid, frames = freed, free_frames = self.free_frames(), "Released pages");
        freed
    }

    /// Pages currently granted to a process
    pub fn pages_of(&self, pid: Pid) -> Vec<Page> {
        self.process_pages.get(&pid).cloned().unwrap_or_default()
    }

    /// Whether the process holds an allocation (possibly of zero pages)
    pub fn has_allocation(&self, pid: Pid) -> bool {
        self.process_pages.contains_key(&pid)
    }

    /// Whether a demand could be satisfied right now
    pub fn can_allocate(&self, demand_kb: Kilobytes) -> bool {
        self.pages_needed(demand_kb) <= self.free_frames()
    }
}
