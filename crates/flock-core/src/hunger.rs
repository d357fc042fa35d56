//! Bounded hunger accumulator.

use serde::{Deserialize, Serialize};

/// Hunger level in `[0, 1]`; 0 is sated, 1 is starving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hunger(f64);

impl Hunger {
    pub const SATED: Hunger = Hunger(0.0);
    pub const STARVING: Hunger = Hunger(1.0);

    /// Build a hunger level, clamping into `[0, 1]`. NaN collapses to sated.
    pub fn new(value: f64) -> Self {
        Self(clamp01(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `hunger > threshold`; equality is not hungry.
    pub fn exceeds(self, threshold: f64) -> bool {
        self.0 > threshold
    }

    /// Accumulate `rate * dt`, saturating at 1.
    pub fn advance(&mut self, rate: f64, dt: f64) {
        self.0 = clamp01(self.0 + rate * dt);
    }

    /// Apply one meal, saturating at 0.
    pub fn eat(&mut self, feeding_rate: f64) {
        self.0 = clamp01(self.0 - feeding_rate);
    }
}

fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamps_at_exactly_one_after_enough_ticks() {
        let mut hunger = Hunger::new(0.9);
        for _ in 0..1_000 {
            hunger.advance(0.01, 1.0);
        }
        assert_eq!(hunger.value(), 1.0);
    }

    #[test]
    fn eat_reduces_by_feeding_rate() {
        let mut hunger = Hunger::new(0.8);
        hunger.eat(0.2);
        assert!((hunger.value() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn eat_clamps_at_zero() {
        let mut hunger = Hunger::new(0.1);
        hunger.eat(0.2);
        assert_eq!(hunger, Hunger::SATED);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!Hunger::new(0.7).exceeds(0.7));
        assert!(Hunger::new(0.71).exceeds(0.7));
    }

    #[test]
    fn nan_input_is_sated() {
        assert_eq!(Hunger::new(f64::NAN), Hunger::SATED);
    }

    proptest! {
        #[test]
        fn advance_is_monotone_and_bounded(
            start in 0.0f64..=1.0,
            rate in 0.0f64..1.0,
            dts in proptest::collection::vec(0.0f64..0.5, 1..64),
        ) {
            let mut hunger = Hunger::new(start);
            for dt in dts {
                let before = hunger.value();
                hunger.advance(rate, dt);
                prop_assert!(hunger.value() >= before);
                prop_assert!(hunger.value() <= 1.0);
            }
        }
    }
}
