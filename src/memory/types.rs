/*!
 * Memory Types
 * Pages, frames, and reporting types for the paged allocator
 */

use crate::core::types::{FrameNumber, Kilobytes, Megabytes, PageNumber, Pid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Insufficient frames for PID {pid}: requested {requested} pages, {available} frames free")]
    InsufficientFrames {
        pid: Pid,
        requested: usize,
        available: usize,
    },

    #[error("PID {0} already holds an allocation")]
    AlreadyAllocated(Pid),
}

/// Virtual page owned by exactly one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub process_id: Pid,
    pub number: PageNumber,
    pub in_memory: bool,
}

impl Page {
    pub fn new(process_id: Pid, number: PageNumber) -> Self {
        Self {
            process_id,
            number,
            in_memory: true,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "P{}:page{}", self.process_id, self.number)
    }
}

/// Physical slot holding at most one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub number: FrameNumber,
    pub page: Option<Page>,
}

impl Frame {
    pub fn new(number: FrameNumber) -> Self {
        Self { number, page: None }
    }

    pub fn bind(&mut self, page: Page) {
        self.page = Some(page);
    }

    /// Unbind the page, marking it swapped out
    pub fn release(&mut self) -> Option<Page> {
        self.page.take().map(|mut page| {
            page.in_memory = false;
            page
        })
    }

    #[inline(always)]
    pub fn is_free(&self) -> bool {
        self.page.is_none()
    }

    pub fn owner(&self) -> Option<Pid> {
        self.page.map(|p| p.process_id)
    }
}

/// One row of the frame table for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMapping {
    pub frame: FrameNumber,
    /// `None` when the frame is free
    pub owner: Option<(Pid, PageNumber)>,
}

impl std::fmt::Display for FrameMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.owner {
            Some((pid, page)) => write!(f, "Frame {:<3} PID {:<5} page {}", self.frame, pid, page),
            None => write!(f, "Frame {:<3} free", self.frame),
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub frame_count: usize,
    pub frame_size_kb: Kilobytes,
    pub free_frames: usize,
    pub total_kb: Kilobytes,
    pub used_kb: Kilobytes,
    pub free_kb: Kilobytes,
    pub total_mb: Megabytes,
    pub used_mb: Megabytes,
    pub free_mb: Megabytes,
    pub usage_percentage: f64,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.usage_percentage)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_usage(usage_percentage: f64) -> Self {
        if usage_percentage >= 95.0 {
            MemoryPressure::Critical
        } else if usage_percentage >= 80.0 {
            MemoryPressure::High
        } else if usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_release_marks_page_out() {
        let mut frame = Frame::new(0);
        frame.bind(Page::new(4, 0));
        assert_eq!(frame.owner(), Some(4));

        let page = frame.release().unwrap();
        assert!(!page.in_memory);
        assert!(frame.is_free());
        assert!(frame.release().is_none());
    }

    #[test]
    fn test_pressure_levels() {
        assert_eq!(MemoryPressure::from_usage(10.0), MemoryPressure::Low);
        assert_eq!(MemoryPressure::from_usage(62.5), MemoryPressure::Medium);
        assert_eq!(MemoryPressure::from_usage(81.25), MemoryPressure::High);
        assert_eq!(MemoryPressure::from_usage(100.0), MemoryPressure::Critical);
    }
}
