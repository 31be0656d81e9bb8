/*!
 * Memory Management
 *
 * Fixed pool of equally sized physical frames handed out page by page.
 *
 * ## Allocation
 *
 * - A demand of D KB needs ceil(D / frame size) pages
 * - Allocation is all-or-nothing: if fewer frames are free than pages are
 *   needed, nothing is bound
 * - Frames are picked first-fit by frame index
 * - Release unbinds every frame whose page belongs to the process and is
 *   idempotent
 */

mod allocator;
mod tracking;

use super::traits::{MemoryInfo, PageAllocator};
use super::types::{Frame, FrameMapping, MemoryResult, MemoryStats, Page};
use crate::core::config::MemoryConfig;
use crate::core::types::{Kilobytes, Pid};
use ahash::RandomState;
use std::collections::HashMap;
use tracing::info;

/// Memory manager
#[derive(Debug, Clone)]
pub struct MemoryManager {
    pub(super) frames: Vec<Frame>,
    pub(super) frame_size_kb: Kilobytes,
    // Per-process page lists, in page-number order
    pub(super) process_pages: HashMap<Pid, Vec<Page>, RandomState>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::from_config(&MemoryConfig::default())
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::with_frames(config.frame_count, config.frame_size_kb)
    }

    /// Create memory manager with custom geometry (useful for testing)
    pub fn with_frames(frame_count: usize, frame_size_kb: Kilobytes) -> Self {
        info!(
            frame_count,
            frame_size_kb,
            total_kb = frame_count * frame_size_kb,
            "Memory manager initialized"
        );
        Self {
            frames: (0..frame_count).map(Frame::new).collect(),
            frame_size_kb: frame_size_kb.max(1),
            process_pages: HashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_size_kb(&self) -> Kilobytes {
        self.frame_size_kb
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

// Implement trait interfaces
impl PageAllocator for MemoryManager {
    fn allocate(&mut self, pid: Pid, demand_kb: Kilobytes) -> MemoryResult<usize> {
        MemoryManager::allocate(self, pid, demand_kb)
    }

    fn release(&mut self, pid: Pid) -> usize {
        MemoryManager::release(self, pid)
    }

    fn pages_of(&self, pid: Pid) -> Vec<Page> {
        MemoryManager::pages_of(self, pid)
    }

    fn pages_needed(&self, demand_kb: Kilobytes) -> usize {
        MemoryManager::pages_needed(self, demand_kb)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn info(&self) -> (Kilobytes, Kilobytes, Kilobytes) {
        MemoryManager::info(self)
    }

    fn memory_map(&self) -> Vec<FrameMapping> {
        MemoryManager::memory_map(self)
    }

    fn process_memory(&self, pid: Pid) -> Kilobytes {
        MemoryManager::process_memory(self, pid)
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
