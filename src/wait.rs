//! Precision wait executor
//!
//! Blocks (or suspends) the caller for a sampled duration.
//!
//! # Blocking
//!
//! `thread::sleep` alone overshoots by up to a scheduler tick, and spinning
//! for the whole wait burns a core. The blocking wait sleeps for all but the
//! last `spin_threshold` of the target, then spins on the monotonic clock
//! until the deadline:
//!
//! ```text
//! Idle -> Sleeping -> Spinning -> Done     (target > spin threshold)
//! Idle -> Spinning -> Done                 (0 < target <= spin threshold)
//! Idle -> Done                             (target == 0)
//! ```
//!
//! The spin phase uses [`SpinBackoff`]: the number of `spin_loop` hints per
//! poll doubles up to `2^spin_cap`, then resets with a `thread::yield_now`.
//!
//! # Non-blocking
//!
//! The async wait races `tokio::time::sleep` against a [`CancellationToken`]
//! and finishes in `Done` or `Cancelled`. Its precision is that of the tokio
//! timer (about a millisecond).

use crate::config::WaitConfig;
use crate::util::fast_time::FastInstant;
use std::fmt;
use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::trace;

/// Cancellation signal shared between a waiter and whoever may cancel it
///
/// Cloning yields a handle to the same signal. Once cancelled a token stays
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel; every clone observes it and pending waits wake up
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a cancel in between is seen
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Phase of a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Idle,
    Sleeping,
    Spinning,
    Done,
    Cancelled,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaitState::Idle => "idle",
            WaitState::Sleeping => "sleeping",
            WaitState::Spinning => "spinning",
            WaitState::Done => "done",
            WaitState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Result of one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Duration the caller asked for
    pub target: Duration,
    /// Time actually spent waiting
    pub elapsed: Duration,
    /// `Done`, or `Cancelled` for an interrupted async wait
    pub final_state: WaitState,
}

impl WaitOutcome {
    pub fn is_cancelled(&self) -> bool {
        self.final_state == WaitState::Cancelled
    }

    /// Signed `elapsed - target` in nanoseconds
    pub fn error_nanos(&self) -> i64 {
        crate::util::time::offset_nanos(self.target, self.elapsed)
    }
}

/// Exponential spin helper
#[derive(Debug)]
pub struct SpinBackoff {
    step: u32,
    cap: u32,
}

impl SpinBackoff {
    pub fn new(cap: u32) -> Self {
        Self { step: 0, cap }
    }

    /// Spin `2^step` times, then advance (or reset and yield at the cap)
    #[inline]
    pub fn spin(&mut self) {
        for _ in 0..(1u32 << self.step) {
            hint::spin_loop();
        }
        if self.step < self.cap {
            self.step += 1;
        } else {
            self.step = 0;
            thread::yield_now();
        }
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}

/// Executes waits with a given [`WaitConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecisionWaiter {
    config: WaitConfig,
}

impl PrecisionWaiter {
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Block the calling thread for `target`
    ///
    /// Never returns early; overshoot is bounded by one spin step once the
    /// spin phase is reached.
    pub fn wait_blocking(&self, target: Duration) -> WaitOutcome {
        let start = FastInstant::now();
        if target.is_zero() {
            return WaitOutcome {
                target,
                elapsed: Duration::ZERO,
                final_state: WaitState::Done,
            };
        }

        let threshold = self.config.spin_threshold();
        if target > threshold {
            trace!(state = %WaitState::Sleeping, sleep = ?(target - threshold), "wait phase");
            thread::sleep(target - threshold);
        }

        trace!(state = %WaitState::Spinning, remaining = ?target.saturating_sub(start.elapsed()), "wait phase");
        let deadline = start.plus(target);
        let mut backoff = SpinBackoff::new(self.config.spin_cap);
        while !deadline.has_passed() {
            backoff.spin();
        }

        let elapsed = start.elapsed();
        trace!(state = %WaitState::Done, ?elapsed, "wait phase");
        WaitOutcome {
            target,
            elapsed,
            final_state: WaitState::Done,
        }
    }

    /// Suspend the current task for `target` unless `token` fires first
    pub async fn wait_async(&self, target: Duration, token: &CancellationToken) -> WaitOutcome {
        let start = FastInstant::now();
        if token.is_cancelled() {
            return WaitOutcome {
                target,
                elapsed: Duration::ZERO,
                final_state: WaitState::Cancelled,
            };
        }
        if target.is_zero() {
            return WaitOutcome {
                target,
                elapsed: Duration::ZERO,
                final_state: WaitState::Done,
            };
        }

        trace!(state = %WaitState::Sleeping, ?target, "async wait phase");
        let final_state = tokio::select! {
            _ = tokio::time::sleep(target) => WaitState::Done,
            _ = token.cancelled() => WaitState::Cancelled,
        };

        let elapsed = start.elapsed();
        trace!(state = %final_state, ?elapsed, "async wait phase");
        WaitOutcome {
            target,
            elapsed,
            final_state,
        }
    }
}
