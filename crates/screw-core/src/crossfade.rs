//! Crossfader - equal-power blend between the two decks
//!
//! Position 0.0 leaves deck A fully audible, 1.0 deck B. The gain law is
//! `cos(p·π/2)` / `sin(p·π/2)`, which keeps the summed power constant across
//! the whole throw (both decks sit at -3.01 dB in the middle).

use std::f32::consts::FRAC_PI_2;

use crate::types::SILENCE_DB;

/// Midpoint used to decide which extreme a chop toggles to
pub const CHOP_BOUNDARY: f32 = 0.5;

/// Linear equal-power gains `(deck_a, deck_b)` for a crossfader position
///
/// The position is clamped to [0, 1].
#[inline]
pub fn equal_power(position: f32) -> (f32, f32) {
    let angle = position.clamp(0.0, 1.0) * FRAC_PI_2;
    (angle.cos(), angle.sin())
}

/// Convert a linear gain to dB, floored at [`SILENCE_DB`]
///
/// Gains at or below zero map straight to the floor instead of `log10(0)`.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        SILENCE_DB
    } else {
        (20.0 * gain.log10()).max(SILENCE_DB)
    }
}

/// Per-deck gains in dB `(deck_a_db, deck_b_db)` for a crossfader position
pub fn gains(position: f32) -> (f32, f32) {
    let (a, b) = equal_power(position);
    (gain_to_db(a), gain_to_db(b))
}

/// Crossfader state
///
/// Holds the position only; gains are always recomputed from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Crossfader {
    position: f32,
}

impl Crossfader {
    /// Create a crossfader resting on deck A
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position (0.0 = deck A, 1.0 = deck B)
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Set the position, clamped to [0, 1]
    ///
    /// NaN is treated as 0.0.
    pub fn set(&mut self, position: f32) {
        self.position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
    }

    /// Extreme a chop would jump to from the current position
    pub fn toggle_target(&self) -> f32 {
        if self.position <= CHOP_BOUNDARY {
            1.0
        } else {
            0.0
        }
    }

    /// Jump to the opposite extreme, returning the new position
    pub fn toggle(&mut self) -> f32 {
        self.position = self.toggle_target();
        self.position
    }

    /// Gains in dB for the current position
    pub fn gains(&self) -> (f32, f32) {
        gains(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_power_law() {
        for i in 0..=100 {
            let p = i as f32 / 100.0;
            let (a, b) = equal_power(p);
            assert!((a * a + b * b - 1.0).abs() < 1e-5, "p = {}", p);
        }
    }

    #[test]
    fn test_gains_at_extremes() {
        assert_eq!(gains(0.0), (0.0, -60.0));
        assert_eq!(gains(1.0), (-60.0, 0.0));
    }

    #[test]
    fn test_gains_at_center() {
        let (a, b) = gains(0.5);
        assert!((a + 3.0103).abs() < 0.01);
        assert!((b + 3.0103).abs() < 0.01);
    }

    #[test]
    fn test_gain_to_db_floor() {
        assert_eq!(gain_to_db(0.0), SILENCE_DB);
        assert_eq!(gain_to_db(-0.5), SILENCE_DB);
        assert_eq!(gain_to_db(1e-6), SILENCE_DB);
        assert!((gain_to_db(0.5) + 6.0206).abs() < 0.001);
    }

    #[test]
    fn test_gains_idempotent() {
        let first = gains(0.37);
        for _ in 0..10 {
            assert_eq!(gains(0.37), first);
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(gains(-1.0), gains(0.0));
        assert_eq!(gains(2.0), gains(1.0));

        let mut xf = Crossfader::new();
        xf.set(1.7);
        assert_eq!(xf.position(), 1.0);
        xf.set(-0.2);
        assert_eq!(xf.position(), 0.0);
        xf.set(f32::NAN);
        assert_eq!(xf.position(), 0.0);
    }

    #[test]
    fn test_toggle_uses_midpoint() {
        let mut xf = Crossfader::new();
        xf.set(0.5);
        assert_eq!(xf.toggle(), 1.0);
        assert_eq!(xf.toggle(), 0.0);

        xf.set(0.51);
        assert_eq!(xf.toggle_target(), 0.0);
    }
}
