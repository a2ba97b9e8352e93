//! Monotonic clock for the spin phase of a precision wait
//!
//! On unix the clock is read with a direct `clock_gettime(CLOCK_MONOTONIC)`
//! call, which is cheaper than `std::time::Instant` and matters when the
//! clock is polled in a tight loop. Other platforms fall back to `Instant`.

use std::time::Duration;

/// Monotonic timestamp with nanosecond resolution
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FastInstant {
    nanos: u64,
}

impl FastInstant {
    /// Read the monotonic clock
    #[cfg(unix)]
    #[inline(always)]
    pub fn now() -> Self {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: `ts` is a valid, writable timespec and CLOCK_MONOTONIC is
        // supported on every unix target
        unsafe {
            libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
        }

        Self {
            nanos: (ts.tv_sec as u64) * 1_000_000_000 + (ts.tv_nsec as u64),
        }
    }

    /// Read the monotonic clock
    #[cfg(not(unix))]
    #[inline(always)]
    pub fn now() -> Self {
        use std::sync::OnceLock;
        use std::time::Instant;

        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = *EPOCH.get_or_init(Instant::now);
        Self {
            nanos: epoch.elapsed().as_nanos() as u64,
        }
    }

    /// Time from `earlier` to `self`, zero if `earlier` is later
    #[inline(always)]
    pub fn duration_since(&self, earlier: FastInstant) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(earlier.nanos))
    }

    /// Time elapsed since this instant
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        Self::now().duration_since(*self)
    }

    /// Instant `duration` after this one, saturating
    #[inline]
    pub fn plus(&self, duration: Duration) -> Self {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        Self {
            nanos: self.nanos.saturating_add(nanos),
        }
    }

    /// Whether the clock has reached this instant
    #[inline(always)]
    pub fn has_passed(&self) -> bool {
        Self::now() >= *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fast_instant_elapsed() {
        let start = FastInstant::now();
        thread::sleep(Duration::from_millis(10));
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_millis(200), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_fast_instant_monotonic() {
        let t1 = FastInstant::now();
        let t2 = FastInstant::now();
        assert!(t2 >= t1);
        assert_eq!(t1.duration_since(t2), Duration::ZERO);
    }

    #[test]
    fn test_deadline() {
        let start = FastInstant::now();
        let deadline = start.plus(Duration::from_millis(2));
        while !deadline.has_passed() {
            std::hint::spin_loop();
        }
        assert!(start.elapsed() >= Duration::from_millis(2));
        assert!(start.plus(Duration::MAX) > deadline);
    }
}
