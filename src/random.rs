//! Uniform variate sources
//!
//! Every sampler is built on [`UniformSource`]. The default source,
//! [`SecureUniform`], draws from a cryptographically secure generator: the
//! normal sampler's Box-Muller transform in particular is sensitive to
//! correlation in low-order bits, which rules out LCG and xorshift style
//! generators for production draws.
//!
//! # Unit interval construction
//!
//! `uniform01` keeps the low 52 bits of a 64-bit draw as the mantissa of a
//! float whose exponent is forced to that of 1.0. That float is uniform over
//! the `2^52` representable values of `[1.0, 2.0)`; subtracting 1.0 maps it
//! onto `[0.0, 1.0)` without modulo bias.
//!
//! # Example
//!
//! ```
//! use durand::random::{SecureUniform, UniformSource};
//!
//! let source = SecureUniform;
//! let u = source.uniform01();
//! assert!((0.0..1.0).contains(&u));
//! let x = source.uniform_range(10.0, 20.0);
//! assert!((10.0..20.0).contains(&x));
//! ```

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::Mutex;

const MANTISSA_MASK: u64 = (1 << 52) - 1;
const EXPONENT_OF_ONE: u64 = 0x3FF0_0000_0000_0000;

/// Map 64 random bits to a float in `[0, 1)`
#[inline]
pub fn unit_from_bits(bits: u64) -> f64 {
    f64::from_bits((bits & MANTISSA_MASK) | EXPONENT_OF_ONE) - 1.0
}

/// Source of uniform random variates
///
/// Implementations must be safe to call from many threads at once; each draw
/// is independent of the others and no ordering between callers is implied.
pub trait UniformSource: Send + Sync {
    /// 64 uniformly random bits
    fn next_u64(&self) -> u64;

    /// Uniform real in `[0, 1)`
    #[inline]
    fn uniform01(&self) -> f64 {
        unit_from_bits(self.next_u64())
    }

    /// Uniform real in `[min, max)`, or `min` when `min == max`
    #[inline]
    fn uniform_range(&self, min: f64, max: f64) -> f64 {
        if min == max {
            return min;
        }
        let u = self.uniform01();
        // Interpolating the endpoints never overflows to inf
        (min * (1.0 - u) + max * u).max(min).min(max)
    }

    /// Uniform integer in `[0, bound)`, or 0 when `bound == 0`
    ///
    /// Rejects the `2^64 mod bound` lowest draws so every residue is equally
    /// likely.
    fn uniform_below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return x % bound;
            }
        }
    }

    /// Uniform integer in `[min, max)`, or `min` when `max <= min`
    fn uniform_int(&self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max as i128 - min as i128) as u64;
        (min as i128 + self.uniform_below(span) as i128) as i64
    }
}

/// Cryptographically secure source
///
/// Reads from `rand`'s thread-local ChaCha generator, which is seeded and
/// periodically reseeded from the operating system. Each thread owns its
/// generator, so concurrent callers never contend on a lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureUniform;

impl UniformSource for SecureUniform {
    #[inline]
    fn next_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }
}

/// Seeded, reproducible source
///
/// Uses xoshiro256++ behind a mutex. Fast and statistically solid, but NOT
/// cryptographically secure: meant for tests and replayable simulations.
#[derive(Debug)]
pub struct SeededUniform {
    rng: Mutex<Xoshiro256PlusPlus>,
}

impl SeededUniform {
    /// Create a new source with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(Xoshiro256PlusPlus::seed_from_u64(seed)),
        }
    }
}

impl UniformSource for SeededUniform {
    fn next_u64(&self) -> u64 {
        // A panic elsewhere cannot leave the generator state half-written
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.next_u64()
    }
}
