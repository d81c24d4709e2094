//! Conservatively-rounded interval arithmetic.
//!
//! An `Interval` is a closed range `[low, high]` that is guaranteed to
//! enclose the exact real result of a computation carried out in finite
//! precision. Every arithmetic operation rounds the resulting low bound one
//! ULP down and the high bound one ULP up, so the enclosure survives any
//! chain of operations.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use crate::float::{next_float_down, next_float_up};

/// A closed interval `[low, high]` with conservatively rounded bounds.
///
/// Invariant: `low <= high`. A degenerate interval (`low == high`) represents
/// an exact value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interval {
    low: f32,
    high: f32,
}

impl Interval {
    /// The maximal interval `(-inf, +inf)`, returned when a result cannot be
    /// bounded (division by an interval containing zero).
    pub const UNIVERSE: Interval = Interval {
        low: f32::NEG_INFINITY,
        high: f32::INFINITY,
    };

    /// Create an interval from two bounds, given in either order.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Create a degenerate interval holding an exact value.
    pub fn from_value(value: f32) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    /// Create an interval around `value` with absolute error `err`.
    ///
    /// A zero error yields the degenerate interval; otherwise both bounds are
    /// rounded outward so the true value is always enclosed.
    pub fn from_value_and_error(value: f32, err: f32) -> Self {
        if err == 0.0 {
            Self::from_value(value)
        } else {
            Self {
                low: next_float_down(value - err),
                high: next_float_up(value + err),
            }
        }
    }

    /// The lower bound.
    #[inline]
    pub fn low(&self) -> f32 {
        self.low
    }

    /// The upper bound.
    #[inline]
    pub fn high(&self) -> f32 {
        self.high
    }

    /// The midpoint `(low + high) / 2`, the best single-value estimate.
    #[inline]
    pub fn midpoint(&self) -> f32 {
        (self.low + self.high) / 2.0
    }

    /// The width `high - low`.
    #[inline]
    pub fn range(&self) -> f32 {
        self.high - self.low
    }

    /// Returns true if `value` is within `[low, high]` (inclusive).
    pub fn contains(&self, value: f32) -> bool {
        value >= self.low && value <= self.high
    }

    /// Returns true if the two intervals intersect.
    pub fn overlaps(&self, other: Interval) -> bool {
        self.low <= other.high && self.high >= other.low
    }
}

/// The midpoint, for callers that need a single scalar.
impl From<Interval> for f32 {
    fn from(interval: Interval) -> f32 {
        interval.midpoint()
    }
}

impl From<f32> for Interval {
    fn from(value: f32) -> Interval {
        Interval::from_value(value)
    }
}

impl PartialEq<f32> for Interval {
    /// True only for a degenerate interval equal to `value`.
    fn eq(&self, value: &f32) -> bool {
        self.low == *value && self.high == *value
    }

    /// `interval != value` asks whether `value` lies outside `[low, high]`.
    /// This is not the negation of `eq`: a value strictly inside a
    /// non-degenerate interval is neither `==` nor `!=` to it.
    #[allow(clippy::partialeq_ne_impl)]
    fn ne(&self, value: &f32) -> bool {
        *value < self.low || *value > self.high
    }
}

impl Neg for Interval {
    type Output = Interval;

    /// Negation is exact; no rounding adjustment is needed.
    fn neg(self) -> Interval {
        Interval::new(-self.low, -self.high)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval::new(
            next_float_down(self.low + rhs.low),
            next_float_up(self.high + rhs.high),
        )
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(
            next_float_down(self.low - rhs.high),
            next_float_up(self.high - rhs.low),
        )
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        // Sign combinations decide which cross product is extremal, so take
        // the min/max over all four.
        let products = [
            self.low * rhs.low,
            self.low * rhs.high,
            self.high * rhs.low,
            self.high * rhs.high,
        ];

        let mut low = next_float_down(products[0]);
        let mut high = next_float_up(products[0]);
        for &p in &products[1..] {
            low = low.min(next_float_down(p));
            high = high.max(next_float_up(p));
        }

        Interval { low, high }
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, rhs: Interval) -> Interval {
        // A divisor that may vanish cannot be bounded.
        if rhs.contains(0.0) {
            return Interval::UNIVERSE;
        }

        let quotients = [
            self.low / rhs.low,
            self.low / rhs.high,
            self.high / rhs.low,
            self.high / rhs.high,
        ];

        let mut low = next_float_down(quotients[0]);
        let mut high = next_float_up(quotients[0]);
        for &q in &quotients[1..] {
            low = low.min(next_float_down(q));
            high = high.max(next_float_up(q));
        }

        Interval { low, high }
    }
}

impl AddAssign for Interval {
    fn add_assign(&mut self, rhs: Interval) {
        self.low = next_float_down(self.low + rhs.low);
        self.high = next_float_up(self.high + rhs.high);
    }
}

impl AddAssign<f32> for Interval {
    fn add_assign(&mut self, value: f32) {
        *self += Interval::from_value(value);
    }
}

impl Add<f32> for Interval {
    type Output = Interval;

    fn add(self, value: f32) -> Interval {
        self + Interval::from_value(value)
    }
}

impl Sub<f32> for Interval {
    type Output = Interval;

    fn sub(self, value: f32) -> Interval {
        self - Interval::from_value(value)
    }
}

impl Mul<f32> for Interval {
    type Output = Interval;

    /// Scalar multiply, specialized on the scalar's sign: a negative scalar
    /// swaps which endpoint produces which bound.
    fn mul(self, value: f32) -> Interval {
        if value > 0.0 {
            Interval::new(
                next_float_down(value * self.low),
                next_float_up(value * self.high),
            )
        } else {
            Interval::new(
                next_float_down(value * self.high),
                next_float_up(value * self.low),
            )
        }
    }
}

impl Div<f32> for Interval {
    type Output = Interval;

    fn div(self, value: f32) -> Interval {
        if value == 0.0 {
            Interval::UNIVERSE
        } else if value > 0.0 {
            Interval::new(
                next_float_down(self.low / value),
                next_float_up(self.high / value),
            )
        } else {
            Interval::new(
                next_float_down(self.high / value),
                next_float_up(self.low / value),
            )
        }
    }
}

impl Add<Interval> for f32 {
    type Output = Interval;

    fn add(self, interval: Interval) -> Interval {
        Interval::from_value(self) + interval
    }
}

impl Sub<Interval> for f32 {
    type Output = Interval;

    fn sub(self, interval: Interval) -> Interval {
        Interval::from_value(self) - interval
    }
}

impl Mul<Interval> for f32 {
    type Output = Interval;

    fn mul(self, interval: Interval) -> Interval {
        interval * self
    }
}

impl Div<Interval> for f32 {
    type Output = Interval;

    fn div(self, interval: Interval) -> Interval {
        if interval.contains(0.0) {
            Interval::UNIVERSE
        } else if self > 0.0 {
            Interval::new(
                next_float_down(self / interval.high),
                next_float_up(self / interval.low),
            )
        } else {
            Interval::new(
                next_float_down(self / interval.low),
                next_float_up(self / interval.high),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::{float_bits_to_float, float_to_bits};
    use crate::lerp;
    use crate::rng::Pcg32;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(3.0, 1.0);
        assert_eq!(interval.low(), 1.0);
        assert_eq!(interval.high(), 3.0);

        let degenerate = Interval::from_value(2.0);
        assert_eq!(degenerate.low(), 2.0);
        assert_eq!(degenerate.high(), 2.0);

        assert_eq!(Interval::default(), Interval::from_value(0.0));
    }

    #[test]
    fn test_from_value_and_error() {
        let exact = Interval::from_value_and_error(5.0, 0.0);
        assert_eq!(exact.low(), 5.0);
        assert_eq!(exact.high(), 5.0);

        let fuzzy = Interval::from_value_and_error(5.0, 0.25);
        assert!(fuzzy.low() < 4.75);
        assert!(fuzzy.high() > 5.25);
        assert!(fuzzy.contains(5.0));
    }

    #[test]
    fn test_midpoint_and_range() {
        let interval = Interval::new(2.0, 6.0);
        assert_eq!(interval.midpoint(), 4.0);
        assert_eq!(interval.range(), 4.0);
        assert_eq!(f32::from(interval), 4.0);
    }

    #[test]
    fn test_equality_with_scalar() {
        // `==` requires a degenerate interval.
        assert!(Interval::new(2.0, 2.0) == 2.0);
        assert!(!(Interval::new(1.0, 3.0) == 2.0));

        // `!=` means "outside the range", not the negation of `==`.
        assert!(!(Interval::new(1.0, 3.0) != 2.0));
        assert!(Interval::new(1.0, 3.0) != 5.0);
        assert!(Interval::new(1.0, 3.0) != 0.5);
    }

    #[test]
    fn test_interval_equality() {
        assert_eq!(Interval::new(1.0, 3.0), Interval::new(3.0, 1.0));
        assert_ne!(Interval::new(1.0, 3.0), Interval::new(1.0, 2.0));
    }

    #[test]
    fn test_negation() {
        let interval = -Interval::new(1.0, 3.0);
        assert_eq!(interval.low(), -3.0);
        assert_eq!(interval.high(), -1.0);
    }

    #[test]
    fn test_add_encloses_sum() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(10.0, 20.0);
        let sum = a + b;
        assert!(sum.low() <= 11.0 && sum.high() >= 22.0);
        assert!(sum.contains(11.0));
        assert!(sum.contains(22.0));
        assert!(sum.contains(15.0));
    }

    #[test]
    fn test_sub_uses_extremal_pairing() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(10.0, 20.0);
        let diff = a - b;
        assert!(diff.low() <= -19.0);
        assert!(diff.high() >= -8.0);
    }

    #[test]
    fn test_mul_sign_combinations() {
        let a = Interval::new(-2.0, 3.0);
        let b = Interval::new(-5.0, 4.0);
        let product = a * b;
        // Extremes: 3 * -5 = -15 and -2 * -5 = 10.
        assert!(product.contains(-15.0));
        assert!(product.contains(10.0));
        assert!(product.low() <= -15.0 && product.high() >= 12.0);
    }

    #[test]
    fn test_div_straddling_zero_is_unbounded() {
        let result = Interval::from_value(5.0) / Interval::new(-2.0, 3.0);
        assert_eq!(result, Interval::UNIVERSE);

        // Touching zero at an endpoint collapses to the same result.
        let touching = Interval::from_value(5.0) / Interval::new(0.0, 3.0);
        assert_eq!(touching, Interval::UNIVERSE);
    }

    #[test]
    fn test_div_away_from_zero() {
        let result = Interval::new(6.0, 12.0) / Interval::new(2.0, 3.0);
        assert!(result.contains(2.0));
        assert!(result.contains(6.0));
        assert!(result.low() <= 2.0 && result.high() >= 6.0);
    }

    #[test]
    fn test_scalar_operators() {
        let interval = Interval::new(1.0, 2.0);

        let shifted = interval + 10.0;
        assert!(shifted.contains(11.0) && shifted.contains(12.0));

        let reflected = 1.0 - interval;
        assert!(reflected.contains(-1.0) && reflected.contains(0.0));

        let scaled = interval * -2.0;
        assert!(scaled.contains(-4.0) && scaled.contains(-2.0));
        assert!(scaled.low() < scaled.high());

        let scaled = -2.0 * interval;
        assert!(scaled.contains(-4.0) && scaled.contains(-2.0));

        let halved = interval / 2.0;
        assert!(halved.contains(0.5) && halved.contains(1.0));

        let inverted = 1.0 / interval;
        assert!(inverted.contains(0.5) && inverted.contains(1.0));

        assert_eq!(interval / 0.0, Interval::UNIVERSE);
        assert_eq!(1.0 / Interval::new(-1.0, 1.0), Interval::UNIVERSE);
    }

    #[test]
    fn test_add_assign() {
        let mut interval = Interval::new(1.0, 2.0);
        interval += Interval::new(3.0, 4.0);
        assert!(interval.contains(4.0) && interval.contains(6.0));

        interval += 1.0;
        assert!(interval.contains(5.0) && interval.contains(7.0));
    }

    #[test]
    fn test_contains_and_overlaps() {
        let interval = Interval::new(0.0, 10.0);
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));

        assert!(interval.overlaps(Interval::new(5.0, 15.0)));
        assert!(interval.overlaps(Interval::new(10.0, 11.0)));
        assert!(!interval.overlaps(Interval::new(11.0, 12.0)));
    }

    // Randomized soundness harness: build intervals with exponentially
    // distributed magnitudes and assorted error bounds, pick "precise" values
    // inside them (favoring the endpoints, the adversarial choice), and check
    // that the exact operation result stays enclosed.

    fn random_interval(rng: &mut Pcg32) -> Interval {
        let logu = lerp(rng.uniform_f32(), -6.0, 6.0);
        let value = 10.0_f32.powf(logu);

        let err = match rng.uniform_bounded(4) {
            0 => 0.0,
            1 => {
                // Small, typical error of up to 1024 ULPs.
                let ulp_error = rng.uniform_bounded(1024);
                let offset = float_bits_to_float(float_to_bits(value) + ulp_error);
                (offset - value).abs()
            }
            2 => {
                // Larger error of up to 2^20 ULPs.
                let ulp_error = rng.uniform_bounded(1024 * 1024);
                let offset = float_bits_to_float(float_to_bits(value) + ulp_error);
                (offset - value).abs()
            }
            _ => (4.0 * rng.uniform_f32()) * value.abs(),
        };

        let sign = if rng.uniform_f32() < 0.5 { -1.0 } else { 1.0 };
        Interval::from_value_and_error(sign * value, err)
    }

    fn precise_value(interval: Interval, rng: &mut Pcg32) -> f64 {
        match rng.uniform_bounded(3) {
            0 => interval.low() as f64,
            1 => interval.high() as f64,
            _ => {
                let t = rng.uniform_f32() as f64;
                let p = (1.0 - t) * interval.low() as f64 + t * interval.high() as f64;
                p.clamp(interval.low() as f64, interval.high() as f64)
            }
        }
    }

    const SOUNDNESS_TRIALS: u64 = 10_000;

    #[test]
    fn test_soundness_add() {
        for trial in 0..SOUNDNESS_TRIALS {
            let mut rng = Pcg32::from_sequence(trial);
            let (a, b) = (random_interval(&mut rng), random_interval(&mut rng));
            let (pa, pb) = (precise_value(a, &mut rng), precise_value(b, &mut rng));

            let result = a + b;
            let precise = pa + pb;
            assert!(precise >= result.low() as f64);
            assert!(precise <= result.high() as f64);
        }
    }

    #[test]
    fn test_soundness_sub() {
        for trial in 0..SOUNDNESS_TRIALS {
            let mut rng = Pcg32::from_sequence(trial);
            let (a, b) = (random_interval(&mut rng), random_interval(&mut rng));
            let (pa, pb) = (precise_value(a, &mut rng), precise_value(b, &mut rng));

            let result = a - b;
            let precise = pa - pb;
            assert!(precise >= result.low() as f64);
            assert!(precise <= result.high() as f64);
        }
    }

    #[test]
    fn test_soundness_mul() {
        for trial in 0..SOUNDNESS_TRIALS {
            let mut rng = Pcg32::from_sequence(trial);
            let (a, b) = (random_interval(&mut rng), random_interval(&mut rng));
            let (pa, pb) = (precise_value(a, &mut rng), precise_value(b, &mut rng));

            let result = a * b;
            let precise = pa * pb;
            assert!(precise >= result.low() as f64);
            assert!(precise <= result.high() as f64);
        }
    }

    #[test]
    fn test_soundness_div() {
        for trial in 0..SOUNDNESS_TRIALS {
            let mut rng = Pcg32::from_sequence(trial);
            let (a, b) = (random_interval(&mut rng), random_interval(&mut rng));
            let (pa, pb) = (precise_value(a, &mut rng), precise_value(b, &mut rng));

            // A divisor straddling zero yields the unbounded interval, which
            // encloses everything; skip to keep the check meaningful.
            if b.low() * b.high() < 0.0 {
                continue;
            }

            let result = a / b;
            let precise = pa / pb;
            assert!(precise >= result.low() as f64);
            assert!(precise <= result.high() as f64);
        }
    }
}
