/*!
 * ID Generation
 * Explicit process ID allocator owned by the process registry
 */

use super::types::Pid;

/// Monotonic process ID allocator
///
/// IDs start at 1, strictly increase, and are never recycled. The allocator
/// is a plain value so each registry carries its own sequence.
#[derive(Debug, Clone)]
pub struct PidAllocator {
    next: Pid,
}

impl PidAllocator {
    /// Create new allocator starting at given value
    #[inline]
    pub fn new(start: Pid) -> Self {
        Self { next: start.max(1) }
    }

    /// Mint the next ID
    #[inline]
    pub fn next(&mut self) -> Pid {
        let pid = self.next;
        self.next += 1;
        pid
    }

    /// The ID the next call to `next` will return
    #[inline]
    pub fn peek(&self) -> Pid {
        self.next
    }

    /// Number of IDs minted so far
    #[inline]
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for PidAllocator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_one() {
        let mut ids = PidAllocator::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.peek(), 3);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_zero_start_is_bumped() {
        let mut ids = PidAllocator::new(0);
        assert_eq!(ids.next(), 1);
    }

    #[test]
    fn test_independent_allocators() {
        let mut a = PidAllocator::default();
        let mut b = PidAllocator::default();
        a.next();
        a.next();
        assert_eq!(b.next(), 1);
    }
}
