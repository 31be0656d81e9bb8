/*!
 * Memory Allocator Tests
 * Frame accounting, first-fit placement, and reporting
 */

use os_sim_kernel::memory::{MemoryInfo, MemoryPressure, PageAllocator};
use os_sim_kernel::{MemoryError, MemoryManager};
use pretty_assertions::assert_eq;

#[test]
fn test_five_frame_request_on_default_pool() {
    let mut mem = MemoryManager::with_frames(16, 256);
    mem.allocate(1, 2 * 256).unwrap();
    let free_before = mem.free_frames();
    assert!(free_before >= 5);

    let granted = mem.allocate(2, 5 * 256).unwrap();
    assert_eq!(granted, 5);
    assert_eq!(mem.free_frames(), free_before - 5);
    assert_eq!(mem.frames_of(2), 5);
}

#[test]
fn test_frames_match_granted_pages() {
    let mut mem = MemoryManager::new();
    for (pid, kb) in [(1, 300), (2, 1024), (3, 1)] {
        let pages = mem.allocate(pid, kb).unwrap();
        assert_eq!(mem.frames_of(pid), pages);
        assert_eq!(mem.pages_of(pid).len(), pages);
        for frame in mem.frames().iter().filter(|f| f.owner() == Some(pid)) {
            assert_eq!(frame.page.unwrap().process_id, pid);
        }
    }
    assert_eq!(mem.used_frames(), 2 + 4 + 1);
}

#[test]
fn test_insufficient_frames_leaves_pool_untouched() {
    let mut mem = MemoryManager::new();
    mem.allocate(1, 14 * 256).unwrap();
    let map_before = mem.memory_map();

    let err = mem.allocate(2, 3 * 256).unwrap_err();
    assert_eq!(
        err,
        MemoryError::InsufficientFrames {
            pid: 2,
            requested: 3,
            available: 2
        }
    );
    assert_eq!(mem.memory_map(), map_before);
}

#[test]
fn test_reporting_through_traits() {
    let mut mem = MemoryManager::new();
    PageAllocator::allocate(&mut mem, 4, 2048).unwrap();

    let stats = MemoryInfo::stats(&mem);
    assert_eq!(stats.total_kb, 4096);
    assert_eq!(stats.used_kb, 2048);
    assert_eq!(stats.free_kb, 2048);
    assert_eq!(stats.used_mb, 2);
    assert_eq!(stats.usage_percentage, 50.0);
    assert_eq!(MemoryInfo::process_memory(&mem, 4), 2048);

    let (total, used, free) = MemoryInfo::info(&mem);
    assert_eq!((total, used, free), (4096, 2048, 2048));
}

#[test]
fn test_pressure_levels() {
    let mut mem = MemoryManager::new();
    assert_eq!(mem.pressure(), MemoryPressure::Low);
    mem.allocate(1, 16 * 256).unwrap();
    assert_eq!(mem.pressure(), MemoryPressure::Critical);
    mem.release(1);
    assert_eq!(mem.pressure(), MemoryPressure::Low);
}

#[test]
fn test_map_rows_show_free_frames() {
    let mut mem = MemoryManager::with_frames(4, 256);
    mem.allocate(9, 256).unwrap();
    let rows: Vec<String> = mem.memory_map().iter().map(|m| m.to_string()).collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].contains('9'));
    assert!(rows[1].to_lowercase().contains("free"));
}
