//! Chop gesture - instant deck swap with a minimum hold
//!
//! Pressing chop throws the crossfader to the opposite extreme. Releasing it
//! throws it back, but never sooner than the minimum hold (one beat): an early
//! release is deferred with a one-shot timer firing at `minimum_hold - elapsed`.
//!
//! ```text
//! Idle --press--> Pressed --release (elapsed >= hold)--> Idle
//!                    |
//!                    +--release (elapsed < hold)--> PendingRelease --fire--> Idle
//!                                                        |
//!                                                        +--press--> Pressed
//! ```
//!
//! A press that arrives while a release is pending cancels the timer and takes
//! over the running chop: the crossfader already sits on the chopped side, so
//! it stays there and the hold restarts from the new press.

use std::time::{Duration, Instant};

use crate::crossfade::Crossfader;
use crate::timer::{Scheduler, TimerId};
use crate::types::beat_ms;

/// Longest minimum hold: one beat at [`crate::types::MIN_BPM`]
pub const MAX_HOLD: Duration = Duration::from_secs(60);

/// Convert a millisecond hold to a `Duration`
///
/// Negative and NaN values map to zero, anything beyond [`MAX_HOLD`]
/// saturates.
pub fn hold_from_ms(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0)
        .map(|hold| hold.min(MAX_HOLD))
        .unwrap_or(MAX_HOLD)
}

/// Minimum chop hold at a tempo: one beat
pub fn chop_duration(tempo_bpm: f64) -> Duration {
    if tempo_bpm > 0.0 {
        hold_from_ms(beat_ms(tempo_bpm))
    } else {
        Duration::ZERO
    }
}

/// Where a chop was triggered from
///
/// The two sources derive their minimum hold differently: on-screen chops use
/// one beat at the live tempo, controller chops use the deck pair offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChopSource {
    /// On-screen button or keyboard
    Ui,
    /// Gamepad button
    Controller,
}

/// Chop state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChopState {
    #[default]
    Idle,
    /// Button held since `pressed_at`
    Pressed { pressed_at: Instant },
    /// Released early; `timer` will swap back
    PendingRelease { timer: TimerId },
}

/// Result of a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Crossfader thrown to the opposite extreme
    Toggled,
    /// A pending release was cancelled; crossfader left where it is
    Resumed { cancelled: TimerId },
    /// Already pressed; nothing changed
    Ignored,
}

/// Result of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Held long enough; crossfader thrown back immediately
    Toggled,
    /// Released early; the swap back happens when `timer` fires
    Deferred { timer: TimerId, delay: Duration },
    /// Not pressed; nothing changed
    Ignored,
}

/// Chop gesture timer
#[derive(Debug, Clone, Default)]
pub struct ChopTimer {
    state: ChopState,
}

impl ChopTimer {
    /// Create an idle chop timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> ChopState {
        self.state
    }

    /// Whether a deferred release is waiting to fire
    pub fn pending_timer(&self) -> Option<TimerId> {
        match self.state {
            ChopState::PendingRelease { timer } => Some(timer),
            _ => None,
        }
    }

    /// Handle a chop press
    pub fn press<S: Scheduler + ?Sized>(
        &mut self,
        now: Instant,
        crossfader: &mut Crossfader,
        scheduler: &mut S,
    ) -> PressOutcome {
        match self.state {
            ChopState::Idle => {
                let target = crossfader.toggle();
                self.state = ChopState::Pressed { pressed_at: now };
                log::debug!("chop: pressed, crossfader -> {}", target);
                PressOutcome::Toggled
            }
            ChopState::PendingRelease { timer } => {
                scheduler.cancel(timer);
                self.state = ChopState::Pressed { pressed_at: now };
                log::debug!(
                    "chop: pressed during pending release, cancelled timer #{}",
                    timer.raw()
                );
                PressOutcome::Resumed { cancelled: timer }
            }
            ChopState::Pressed { .. } => {
                log::debug!("chop: press ignored, already held");
                PressOutcome::Ignored
            }
        }
    }

    /// Handle a chop release
    ///
    /// `minimum_hold` is evaluated by the caller at release time from the
    /// current tempo.
    pub fn release<S: Scheduler + ?Sized>(
        &mut self,
        now: Instant,
        minimum_hold: Duration,
        crossfader: &mut Crossfader,
        scheduler: &mut S,
    ) -> ReleaseOutcome {
        let ChopState::Pressed { pressed_at } = self.state else {
            log::debug!("chop: release ignored in state {:?}", self.state);
            return ReleaseOutcome::Ignored;
        };

        let elapsed = now.saturating_duration_since(pressed_at);
        if elapsed >= minimum_hold {
            let target = crossfader.toggle();
            self.state = ChopState::Idle;
            log::debug!(
                "chop: released after {:?} (hold {:?}), crossfader -> {}",
                elapsed,
                minimum_hold,
                target
            );
            ReleaseOutcome::Toggled
        } else {
            let delay = minimum_hold - elapsed;
            let timer = scheduler.schedule_once(now, delay);
            self.state = ChopState::PendingRelease { timer };
            log::debug!(
                "chop: released early after {:?}, deferring swap by {:?}",
                elapsed,
                delay
            );
            ReleaseOutcome::Deferred { timer, delay }
        }
    }

    /// Handle a fired one-shot
    ///
    /// Returns true if the timer belonged to this chop and the crossfader was
    /// thrown back. Stale ids are ignored.
    pub fn fire(&mut self, timer: TimerId, crossfader: &mut Crossfader) -> bool {
        match self.state {
            ChopState::PendingRelease { timer: pending } if pending == timer => {
                let target = crossfader.toggle();
                self.state = ChopState::Idle;
                log::debug!("chop: deferred release fired, crossfader -> {}", target);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;

    const HOLD: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_chop_duration_is_one_beat() {
        assert_eq!(chop_duration(120.0), ms(500));
        assert_eq!(chop_duration(60.0), ms(1000));
        assert_eq!(chop_duration(0.0), Duration::ZERO);
    }

    #[test]
    fn test_hold_from_ms_rejects_invalid() {
        assert_eq!(hold_from_ms(-5.0), Duration::ZERO);
        assert_eq!(hold_from_ms(f64::NAN), Duration::ZERO);
        assert_eq!(hold_from_ms(250.0), ms(250));
    }

    #[test]
    fn test_hold_saturates() {
        assert_eq!(hold_from_ms(f64::INFINITY), MAX_HOLD);
        assert_eq!(hold_from_ms(6e304), MAX_HOLD);
        assert_eq!(hold_from_ms(90_000.0), MAX_HOLD);
        assert_eq!(chop_duration(1e-300), MAX_HOLD);
        assert_eq!(chop_duration(crate::types::MIN_BPM), MAX_HOLD);
    }

    #[test]
    fn test_long_hold_toggles_synchronously() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        assert_eq!(chop.press(t0, &mut xf, &mut timers), PressOutcome::Toggled);
        assert_eq!(xf.position(), 1.0);

        let outcome = chop.release(t0 + ms(600), HOLD, &mut xf, &mut timers);
        assert_eq!(outcome, ReleaseOutcome::Toggled);
        assert_eq!(xf.position(), 0.0);
        assert!(timers.is_empty());
        assert_eq!(chop.state(), ChopState::Idle);
    }

    #[test]
    fn test_release_at_exact_hold_is_synchronous() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        chop.press(t0, &mut xf, &mut timers);
        let outcome = chop.release(t0 + HOLD, HOLD, &mut xf, &mut timers);
        assert_eq!(outcome, ReleaseOutcome::Toggled);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_early_release_is_deferred() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        chop.press(t0, &mut xf, &mut timers);
        let outcome = chop.release(t0 + ms(200), HOLD, &mut xf, &mut timers);
        let ReleaseOutcome::Deferred { timer, delay } = outcome else {
            panic!("expected deferred release, got {:?}", outcome);
        };
        assert_eq!(delay, ms(300));

        // Nothing changes before the timer fires
        assert_eq!(xf.position(), 1.0);
        assert!(timers.take_expired(t0 + ms(499)).is_empty());

        let expired = timers.take_expired(t0 + ms(500));
        assert_eq!(expired, vec![timer]);
        assert!(chop.fire(timer, &mut xf));
        assert_eq!(xf.position(), 0.0);
        assert_eq!(chop.state(), ChopState::Idle);
    }

    #[test]
    fn test_press_during_pending_release_coalesces() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        chop.press(t0, &mut xf, &mut timers);
        let ReleaseOutcome::Deferred { timer, .. } =
            chop.release(t0 + ms(100), HOLD, &mut xf, &mut timers)
        else {
            panic!("expected deferred release");
        };

        let outcome = chop.press(t0 + ms(150), &mut xf, &mut timers);
        assert_eq!(outcome, PressOutcome::Resumed { cancelled: timer });
        assert!(timers.is_empty());
        // Still on the chopped side, no double toggle
        assert_eq!(xf.position(), 1.0);

        // The cancelled timer is stale now
        assert!(!chop.fire(timer, &mut xf));
        assert_eq!(xf.position(), 1.0);

        // Hold restarts from the second press
        let outcome = chop.release(t0 + ms(650), HOLD, &mut xf, &mut timers);
        assert_eq!(outcome, ReleaseOutcome::Toggled);
        assert_eq!(xf.position(), 0.0);
    }

    #[test]
    fn test_quick_succession_presses() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        for i in 0..5u64 {
            let at = t0 + ms(i * 40);
            chop.press(at, &mut xf, &mut timers);
            chop.release(at + ms(20), HOLD, &mut xf, &mut timers);
            assert!(timers.len() <= 1, "only one timer in flight");
        }

        let fired = timers.take_expired(t0 + ms(2000));
        assert_eq!(fired.len(), 1);
        assert!(chop.fire(fired[0], &mut xf));
        assert_eq!(xf.position(), 0.0);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();

        assert_eq!(
            chop.release(t0, HOLD, &mut xf, &mut timers),
            ReleaseOutcome::Ignored
        );
        assert_eq!(xf.position(), 0.0);
    }

    #[test]
    fn test_press_toggles_from_b_side() {
        let t0 = Instant::now();
        let mut chop = ChopTimer::new();
        let mut xf = Crossfader::new();
        let mut timers = TimerQueue::new();
        xf.set(0.8);

        chop.press(t0, &mut xf, &mut timers);
        assert_eq!(xf.position(), 0.0);
        assert_eq!(chop.press(t0, &mut xf, &mut timers), PressOutcome::Ignored);
    }
}
