//! Time abstraction for the mixer loop
//!
//! The engine measures everything in milliseconds on a wrapping `u32`
//! clock. Platform layers implement [`TimeSource`] over their tick timer;
//! tests drive time with [`MockTime`].

use core::sync::atomic::{AtomicU32, Ordering};

/// Millisecond clock feeding the control loop.
///
/// # Example
///
/// ```
/// use txmix_core::traits::{MockTime, TimeSource};
///
/// fn due<T: TimeSource>(time: &T, last_tick: u32) -> bool {
///     time.elapsed_since(last_tick) >= 20
/// }
///
/// let time = MockTime::new();
/// assert!(!due(&time, 0));
/// time.advance(20);
/// assert!(due(&time, 0));
/// ```
pub trait TimeSource: Send + Sync {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u32;

    /// Returns elapsed milliseconds since a reference point.
    ///
    /// Uses wrapping subtraction so the result stays correct across clock
    /// wrap-around.
    fn elapsed_since(&self, reference_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(reference_ms)
    }
}

/// Mock time source with controllable time advancement.
#[derive(Debug, Default)]
pub struct MockTime {
    current_ms: AtomicU32,
}

impl Clone for MockTime {
    fn clone(&self) -> Self {
        Self::with_initial(self.now_ms())
    }
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub const fn new() -> Self {
        Self::with_initial(0)
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub const fn with_initial(ms: u32) -> Self {
        Self {
            current_ms: AtomicU32::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u32) {
        self.current_ms.store(ms, Ordering::Relaxed);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, ms: u32) {
        self.current_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u32 {
        self.current_ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_time_initial_value() {
        assert_eq!(MockTime::new().now_ms(), 0);
        assert_eq!(MockTime::with_initial(5000).now_ms(), 5000);
    }

    #[test]
    fn test_mock_time_set_and_advance() {
        let time = MockTime::new();
        time.set(1000);
        time.advance(20);
        assert_eq!(time.now_ms(), 1020);
    }

    #[test]
    fn test_clone_is_independent() {
        let time = MockTime::with_initial(40);
        let copy = time.clone();
        time.advance(20);
        assert_eq!(copy.now_ms(), 40);
    }

    #[test]
    fn test_elapsed_since_wraps() {
        let time = MockTime::with_initial(10);
        assert_eq!(time.elapsed_since(u32::MAX - 9), 20);
        assert_eq!(time.elapsed_since(4), 6);
    }
}
