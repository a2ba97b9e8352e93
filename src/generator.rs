//! Random duration generator
//!
//! [`RandomDuration`] ties a validated configuration, its sampler, a uniform
//! source and the wait executor together. It is the type most callers need:
//!
//! ```
//! use durand::{DurationConfig, RandomDuration};
//!
//! let jitter = RandomDuration::new(DurationConfig::normal_fit(5.0, 15.0)).unwrap();
//! let delay = jitter.next().unwrap();
//! assert!(delay.as_secs_f64() >= 0.005 && delay.as_secs_f64() <= 0.015);
//! ```

use crate::config::{DurationConfig, WaitConfig};
use crate::distribution::{build_sampler, Sampler};
use crate::error::DurationError;
use crate::random::{SecureUniform, UniformSource};
use crate::wait::{CancellationToken, PrecisionWaiter, WaitOutcome};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Bounded random-duration generator
///
/// `Send + Sync`; share it behind an `Arc` to draw from many threads.
pub struct RandomDuration {
    sampler: Box<dyn Sampler>,
    source: Arc<dyn UniformSource>,
    waiter: PrecisionWaiter,
}

impl RandomDuration {
    /// Validate `config` and build a generator on the secure source
    pub fn new(config: DurationConfig) -> Result<Self> {
        Self::with_source(config, Arc::new(SecureUniform))
    }

    /// Build a generator on a caller-provided source
    pub fn with_source(config: DurationConfig, source: Arc<dyn UniformSource>) -> Result<Self> {
        let sampler = build_sampler(&config)?;
        Ok(Self {
            sampler,
            source,
            waiter: PrecisionWaiter::default(),
        })
    }

    /// Same generator with a different wait configuration
    pub fn with_wait_config(mut self, config: WaitConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|message| DurationError::invalid(self.config(), message))?;
        self.waiter = PrecisionWaiter::new(config);
        Ok(self)
    }

    pub fn config(&self) -> &DurationConfig {
        self.sampler.config()
    }

    pub fn wait_config(&self) -> &WaitConfig {
        self.waiter.config()
    }

    /// Draw one value in the configuration's unit
    pub fn next_value(&self) -> Result<f64> {
        self.sampler.sample(self.source.as_ref())
    }

    /// Draw one duration
    ///
    /// Values at or below zero (possible when the interval extends below
    /// zero) become `Duration::ZERO`.
    pub fn next(&self) -> Result<Duration> {
        let value = self.next_value()?;
        Ok(self.config().to_duration(value))
    }

    /// Draw one duration and block the calling thread for it
    pub fn wait(&self) -> Result<WaitOutcome> {
        let target = self.next()?;
        Ok(self.waiter.wait_blocking(target))
    }

    /// Draw one duration and suspend the current task for it
    ///
    /// Returns [`DurationError::Cancelled`] without sampling if the token is
    /// already cancelled, or once it fires during the wait.
    pub async fn wait_async(&self, token: &CancellationToken) -> Result<WaitOutcome> {
        if token.is_cancelled() {
            return Err(DurationError::Cancelled);
        }
        let target = self.next()?;
        let outcome = self.waiter.wait_async(target, token).await;
        if outcome.is_cancelled() {
            return Err(DurationError::Cancelled);
        }
        Ok(outcome)
    }
}

impl fmt::Debug for RandomDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomDuration")
            .field("config", self.config())
            .field("wait", self.wait_config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use crate::random::SeededUniform;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    /// Counts draws made through it
    struct Counting {
        inner: SeededUniform,
        draws: AtomicU64,
    }

    impl UniformSource for Counting {
        fn next_u64(&self) -> u64 {
            self.draws.fetch_add(1, Ordering::Relaxed);
            self.inner.next_u64()
        }
    }

    fn counting(seed: u64) -> Arc<Counting> {
        Arc::new(Counting {
            inner: SeededUniform::with_seed(seed),
            draws: AtomicU64::new(0),
        })
    }

    #[test]
    fn test_next_within_bounds() {
        let generator = RandomDuration::new(DurationConfig::uniform(10.0, 20.0)).unwrap();
        for _ in 0..10_000 {
            let d = generator.next().unwrap();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20), "{:?}", d);
        }
    }

    #[test]
    fn test_units_applied() {
        let config = DurationConfig::uniform(1.0, 2.0).with_unit(TimeUnit::Seconds);
        let generator = RandomDuration::new(config).unwrap();
        let d = generator.next().unwrap();
        assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(2));
    }

    #[test]
    fn test_negative_values_map_to_zero() {
        let generator = RandomDuration::new(DurationConfig::uniform(-2.0, -1.0)).unwrap();
        assert!(generator.next_value().unwrap() < 0.0);
        assert_eq!(generator.next().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = RandomDuration::new(DurationConfig::uniform(3.0, 3.0)).unwrap_err();
        assert!(err.is_invalid_config());
        let err = RandomDuration::new(DurationConfig::uniform(0.0, 1.0))
            .unwrap()
            .with_wait_config(WaitConfig {
                spin_cap: 99,
                ..WaitConfig::default()
            })
            .unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_seeded_source_reproducible() {
        let config = DurationConfig::beta(0.0, 100.0, 2.0, 3.0);
        let a = RandomDuration::with_source(config.clone(), Arc::new(SeededUniform::with_seed(7))).unwrap();
        let b = RandomDuration::with_source(config, Arc::new(SeededUniform::with_seed(7))).unwrap();
        for _ in 0..100 {
            assert_eq!(a.next().unwrap(), b.next().unwrap());
        }
    }

    #[test]
    fn test_wait_samples_once() {
        let source = counting(1);
        let generator =
            RandomDuration::with_source(DurationConfig::uniform(0.1, 0.5), source.clone()).unwrap();
        let outcome = generator.wait().unwrap();
        assert_eq!(source.draws.load(Ordering::Relaxed), 1);
        assert!(outcome.elapsed >= outcome.target);
        assert!(outcome.target >= Duration::from_micros(100));
    }

    #[test]
    fn test_shared_across_threads() {
        let generator = Arc::new(RandomDuration::new(DurationConfig::normal_fit(30.0, 70.0)).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        let d = generator.next().unwrap();
                        assert!(d >= Duration::from_millis(30) && d <= Duration::from_millis(70));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[tokio::test]
    async fn test_wait_async_samples_once() {
        let source = counting(2);
        let generator =
            RandomDuration::with_source(DurationConfig::uniform(1.0, 3.0), source.clone()).unwrap();
        let token = CancellationToken::new();
        let outcome = generator.wait_async(&token).await.unwrap();
        assert_eq!(source.draws.load(Ordering::Relaxed), 1);
        assert!(outcome.elapsed >= outcome.target);
    }

    #[tokio::test]
    async fn test_wait_async_cancelled_before_sampling() {
        let source = counting(3);
        let generator =
            RandomDuration::with_source(DurationConfig::uniform(1.0, 3.0), source.clone()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let err = generator.wait_async(&token).await.unwrap_err();
        assert_eq!(err, DurationError::Cancelled);
        assert_eq!(source.draws.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_wait_async_cancelled_during_wait() {
        let config = DurationConfig::uniform(10.0, 20.0).with_unit(TimeUnit::Seconds);
        let generator = RandomDuration::new(config).unwrap();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let err = generator.wait_async(&token).await.unwrap_err();
        assert_eq!(err, DurationError::Cancelled);
    }
}
