/*!
 * Memory Reporting
 * Pure-read statistics and frame map
 */

use super::super::types::{FrameMapping, MemoryStats};
use super::MemoryManager;
use crate::core::limits::KB_PER_MB;
use crate::core::types::{Kilobytes, Pid};

impl MemoryManager {
    pub fn free_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.is_free()).count()
    }

    pub fn used_frames(&self) -> usize {
        self.frames.len() - self.free_frames()
    }

    /// Frames bound to a process
    pub fn frames_of(&self, pid: Pid) -> usize {
        self.frames.iter().filter(|f| f.owner() == Some(pid)).count()
    }

    /// (total, used, available) in KB
    pub fn info(&self) -> (Kilobytes, Kilobytes, Kilobytes) {
        let total = self.frames.len() * self.frame_size_kb;
        let used = self.used_frames() * self.frame_size_kb;
        (total, used, total - used)
    }

    pub fn process_memory(&self, pid: Pid) -> Kilobytes {
        self.frames_of(pid) * self.frame_size_kb
    }

    pub fn stats(&self) -> MemoryStats {
        let (total_kb, used_kb, free_kb) = self.info();
        let usage_percentage = if total_kb == 0 {
            0.0
        } else {
            (used_kb as f64 / total_kb as f64) * 100.0
        };

        MemoryStats {
            frame_count: self.frames.len(),
            frame_size_kb: self.frame_size_kb,
            free_frames: self.free_frames(),
            total_kb,
            used_kb,
            free_kb,
            total_mb: total_kb / KB_PER_MB,
            used_mb: used_kb / KB_PER_MB,
            free_mb: free_kb / KB_PER_MB,
            usage_percentage,
        }
    }

    /// Every frame with its owning (pid, page), or `None` when free
    pub fn memory_map(&self) -> Vec<FrameMapping> {
        self.frames
            .iter()
            .map(|frame| FrameMapping {
                frame: frame.number,
                owner: frame.page.map(|p| (p.process_id, p.number)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_stats() {
        let mem = MemoryManager::new();
        let stats = mem.stats();
        assert_eq!(stats.total_kb, 4096);
        assert_eq!(stats.total_mb, 4);
        assert_eq!(stats.free_frames, 16);
        assert_eq!(stats.usage_percentage, 0.0);
    }

    #[test]
    fn test_memory_map_rows() {
        let mut mem = MemoryManager::with_frames(3, 256);
        mem.allocate(7, 300).unwrap();
        let map = mem.memory_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map[0].owner, Some((7, 0)));
        assert_eq!(map[1].owner, Some((7, 1)));
        assert_eq!(map[2].owner, None);
        assert_eq!(mem.process_memory(7), 512);
    }
}
