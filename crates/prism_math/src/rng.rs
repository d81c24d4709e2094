//! Deterministic pseudorandom number generation.
//!
//! `Pcg32` is a 64-bit permuted linear-congruential generator (the PCG-32
//! scheme of Melissa O'Neill) with:
//!
//! - Selectable, independent streams identified by a sequence index
//! - Uniform draws of 32/64-bit words, signed integers, and floats in `[0,1)`
//! - O(log n) jump-ahead and rewind via `advance`
//! - Signed step distance between two generators on the same stream
//!
//! One generator instance per logical task; the state is mutated by every
//! draw and carries no synchronization.

use rand::{Error, RngCore, SeedableRng};

const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

/// Largest f32 strictly less than 1, the upper clamp for unit-range draws.
const ONE_MINUS_EPSILON_F32: f32 = 1.0 - f32::EPSILON / 2.0;
const ONE_MINUS_EPSILON_F64: f64 = 1.0 - f64::EPSILON / 2.0;

const F32_SCALE: f32 = 1.0 / 4_294_967_296.0; // 2^-32
const F64_SCALE: f64 = 1.0 / 18_446_744_073_709_551_616.0; // 2^-64

/// Avalanche bit mixer over a 64-bit word.
///
/// Used to derive a reproducible pseudo-random seed offset from a sequence
/// index, so a single integer selects both the stream and a scrambled
/// starting point.
#[inline]
pub fn mix_bits(mut v: u64) -> u64 {
    v ^= v >> 31;
    v = v.wrapping_mul(0x7fb5_d329_728e_a185);
    v ^= v >> 27;
    v = v.wrapping_mul(0x81da_def4_bc2d_d44d);
    v ^= v >> 33;
    v
}

/// PCG-32 pseudorandom number generator.
///
/// `state` advances on every draw; `inc` is the odd stream selector fixed at
/// seeding time. Two generators seeded with the same `(sequence, seed)` pair
/// produce identical output; different sequence indices produce independent,
/// non-overlapping streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Default for Pcg32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Pcg32 {
    /// Create a generator with the library default state and stream.
    pub fn new() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }

    /// Create a generator seeded from a sequence index, with the seed offset
    /// derived via `mix_bits`.
    pub fn from_sequence(sequence_index: u64) -> Self {
        Self::from_sequence_and_seed(sequence_index, mix_bits(sequence_index))
    }

    /// Create a generator seeded from a sequence index and an explicit seed.
    pub fn from_sequence_and_seed(sequence_index: u64, seed: u64) -> Self {
        let mut rng = Self { state: 0, inc: 0 };
        rng.set_sequence_with_seed(sequence_index, seed);
        rng
    }

    /// Reseed from a sequence index, deriving the seed offset via `mix_bits`.
    pub fn set_sequence(&mut self, sequence_index: u64) {
        self.set_sequence_with_seed(sequence_index, mix_bits(sequence_index));
    }

    /// Reseed from a sequence index and an explicit seed.
    ///
    /// The increment is forced odd (required for the recurrence to reach its
    /// full period), and the seed is mixed into the state between two warmup
    /// draws.
    pub fn set_sequence_with_seed(&mut self, sequence_index: u64, seed: u64) {
        self.state = 0;
        self.inc = (sequence_index << 1) | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(seed);
        self.uniform_u32();
    }

    /// Draw a uniform 32-bit word.
    ///
    /// The output permutes the pre-advance state: an xorshift fold followed
    /// by a rotation whose amount comes from the state's top bits, so the
    /// rotation itself varies from draw to draw.
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rotation = (old_state >> 59) as u32;
        (xor_shifted >> rotation) | (xor_shifted << (rotation.wrapping_neg() & 31))
    }

    /// Draw a uniform 64-bit word (high word first, then low).
    pub fn uniform_u64(&mut self) -> u64 {
        let v0 = self.uniform_u32() as u64;
        let v1 = self.uniform_u32() as u64;
        (v0 << 32) | v1
    }

    /// Draw a uniform signed 32-bit value over the full `i32` range.
    pub fn uniform_i32(&mut self) -> i32 {
        self.uniform_u32() as i32
    }

    /// Draw a uniform signed 64-bit value over the full `i64` range.
    pub fn uniform_i64(&mut self) -> i64 {
        self.uniform_u64() as i64
    }

    /// Draw a uniform float in `[0, 1)`.
    ///
    /// The scaled word is clamped below 1 so rounding can never produce the
    /// excluded upper bound.
    pub fn uniform_f32(&mut self) -> f32 {
        (self.uniform_u32() as f32 * F32_SCALE).min(ONE_MINUS_EPSILON_F32)
    }

    /// Draw a uniform double in `[0, 1)`. Consumes two 32-bit words.
    pub fn uniform_f64(&mut self) -> f64 {
        (self.uniform_u64() as f64 * F64_SCALE).min(ONE_MINUS_EPSILON_F64)
    }

    /// Draw a uniform value of any supported output type.
    pub fn uniform<T: UniformValue>(&mut self) -> T {
        T::sample(self)
    }

    /// Draw a uniform value in `[0, bound)` without modulo bias.
    ///
    /// Rejection sampling: draws below `threshold = (-bound) mod bound` are
    /// discarded so every residue is equally likely. `bound` must be nonzero.
    pub fn uniform_bounded(&mut self, bound: u32) -> u32 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let v = self.uniform_u32();
            if v >= threshold {
                return v % bound;
            }
        }
    }

    /// 64-bit variant of `uniform_bounded`. `bound` must be nonzero.
    pub fn uniform_bounded_u64(&mut self, bound: u64) -> u64 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let v = self.uniform_u64();
            if v >= threshold {
                return v % bound;
            }
        }
    }

    /// Jump the generator `delta` steps ahead in O(log |delta|) time.
    ///
    /// A negative `delta` rewinds: it wraps to a forward jump of
    /// `2^64 - |delta|` steps, which lands on the same state the single-step
    /// recurrence would have produced. The accumulated multiplier and
    /// increment of the affine step are composed by square-and-multiply and
    /// applied once.
    pub fn advance(&mut self, delta: i64) {
        let mut cur_mult = PCG32_MULT;
        let mut cur_plus = self.inc;
        let mut acc_mult: u64 = 1;
        let mut acc_plus: u64 = 0;

        let mut delta = delta as u64;
        while delta > 0 {
            if delta & 1 != 0 {
                acc_mult = acc_mult.wrapping_mul(cur_mult);
                acc_plus = acc_plus.wrapping_mul(cur_mult).wrapping_add(cur_plus);
            }
            cur_plus = cur_mult.wrapping_add(1).wrapping_mul(cur_plus);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
            delta >>= 1;
        }

        self.state = self.state.wrapping_mul(acc_mult).wrapping_add(acc_plus);
    }

    /// Signed number of steps from `other` to `self`.
    ///
    /// Both generators must be on the same stream. The distance is rebuilt
    /// bit by bit from least significant to most significant by replaying the
    /// recurrence's power-of-two jumps, and satisfies
    /// `other.advance(self.distance(&other))` landing on `self`'s state.
    pub fn distance(&self, other: &Pcg32) -> i64 {
        debug_assert_eq!(
            self.inc, other.inc,
            "distance requires generators on the same stream"
        );

        let mut cur_mult = PCG32_MULT;
        let mut cur_plus = self.inc;
        let mut cur_state = other.state;
        let mut the_bit: u64 = 1;
        let mut distance: u64 = 0;

        while self.state != cur_state {
            if (self.state & the_bit) != (cur_state & the_bit) {
                cur_state = cur_state.wrapping_mul(cur_mult).wrapping_add(cur_plus);
                distance |= the_bit;
            }
            the_bit <<= 1;
            cur_plus = cur_mult.wrapping_add(1).wrapping_mul(cur_plus);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
        }

        distance as i64
    }
}

/// `a - b` is the signed step distance from `b` to `a` on a shared stream.
impl std::ops::Sub for Pcg32 {
    type Output = i64;

    fn sub(self, rhs: Pcg32) -> i64 {
        self.distance(&rhs)
    }
}

/// Output types `Pcg32::uniform` can draw.
///
/// The set is closed over exactly `u32`, `u64`, `i32`, `i64`, `f32`, and
/// `f64`; any other type is a compile error rather than a runtime trap.
pub trait UniformValue: Sized {
    fn sample(rng: &mut Pcg32) -> Self;
}

impl UniformValue for u32 {
    fn sample(rng: &mut Pcg32) -> u32 {
        rng.uniform_u32()
    }
}

impl UniformValue for u64 {
    fn sample(rng: &mut Pcg32) -> u64 {
        rng.uniform_u64()
    }
}

impl UniformValue for i32 {
    fn sample(rng: &mut Pcg32) -> i32 {
        rng.uniform_i32()
    }
}

impl UniformValue for i64 {
    fn sample(rng: &mut Pcg32) -> i64 {
        rng.uniform_i64()
    }
}

impl UniformValue for f32 {
    fn sample(rng: &mut Pcg32) -> f32 {
        rng.uniform_f32()
    }
}

impl UniformValue for f64 {
    fn sample(rng: &mut Pcg32) -> f64 {
        rng.uniform_f64()
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        self.uniform_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.uniform_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.uniform_u32().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Pcg32 {
    /// Sequence index in the first 8 bytes, seed offset in the last 8
    /// (little endian).
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut sequence_index = [0u8; 8];
        let mut offset = [0u8; 8];
        sequence_index.copy_from_slice(&seed[..8]);
        offset.copy_from_slice(&seed[8..]);
        Self::from_sequence_and_seed(u64::from_le_bytes(sequence_index), u64::from_le_bytes(offset))
    }
}
