//! Vinyl brake with spring-back
//!
//! The brake amount (0.0 = running, 1.0 = stopped platter) follows the
//! trigger directly while it is held. Letting go starts a spring animation
//! that eases the amount back to zero on the control tick.

use std::time::Duration;

/// Active spring-back animation
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spring {
    /// Amount when the spring started
    from: f32,
    /// Time spent springing so far
    elapsed: Duration,
}

/// Vinyl brake state
#[derive(Debug, Clone, PartialEq)]
pub struct VinylBrake {
    amount: f32,
    spring: Option<Spring>,
    spring_duration: Duration,
}

/// Ease-out cubic: fast at the start, settling gently
#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

impl VinylBrake {
    /// Create a released brake
    pub fn new(spring_duration: Duration) -> Self {
        Self {
            amount: 0.0,
            spring: None,
            spring_duration,
        }
    }

    /// Current brake amount
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Whether a spring-back is running
    pub fn is_springing(&self) -> bool {
        self.spring.is_some()
    }

    /// Set the amount directly, cancelling any spring-back
    pub fn set_amount(&mut self, amount: f32) -> f32 {
        self.spring = None;
        self.amount = if amount.is_nan() {
            0.0
        } else {
            amount.clamp(0.0, 1.0)
        };
        self.amount
    }

    /// Start easing back to zero
    ///
    /// Does nothing if the brake is already released.
    pub fn start_spring(&mut self) {
        if self.amount <= 0.0 {
            return;
        }
        log::debug!("brake: spring back from {:.2}", self.amount);
        if self.spring_duration.is_zero() {
            self.amount = 0.0;
            self.spring = None;
        } else {
            self.spring = Some(Spring {
                from: self.amount,
                elapsed: Duration::ZERO,
            });
        }
    }

    /// Advance the spring by `dt`; returns the new amount if it changed
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        let spring = self.spring.as_mut()?;
        spring.elapsed += dt;

        if spring.elapsed >= self.spring_duration {
            self.spring = None;
            self.amount = 0.0;
        } else {
            let t = spring.elapsed.as_secs_f32() / self.spring_duration.as_secs_f32();
            self.amount = spring.from * (1.0 - ease_out_cubic(t));
        }
        Some(self.amount)
    }
}
