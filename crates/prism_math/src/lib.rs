//! Numerics core for the Prism renderer.
//!
//! Two self-contained subsystems:
//!
//! - **Interval arithmetic**: `Interval` tracks worst-case floating point
//!   error bounds through chains of operations by rounding every computed
//!   bound conservatively outward.
//! - **Random number generation**: `Pcg32` is a deterministic,
//!   stream-addressable PCG-32 generator with O(log n) jump-ahead/rewind and
//!   signed distance between generator states.

mod float;
mod interval;
mod rng;

pub use float::{float_bits_to_float, float_to_bits, next_float_down, next_float_up};
pub use interval::Interval;
pub use rng::{mix_bits, Pcg32, UniformValue};

/// Linear interpolation: `(1 - t) * a + t * b`.
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    (1.0 - t) * a + t * b
}
