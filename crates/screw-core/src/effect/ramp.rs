//! Wet-mix ramps for held effects
//!
//! Holding an effect button fades its wet mix in; letting go fades it out.
//! Ramps are linear and advanced by the control tick.

use std::time::Duration;

use super::{EffectKind, EffectParam};

/// Linear ramp of a single effect's wet mix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixRamp {
    level: f32,
    target: f32,
    duration: Duration,
}

impl MixRamp {
    /// Create a dry ramp that takes `duration` to travel the full range
    pub fn new(duration: Duration) -> Self {
        Self {
            level: 0.0,
            target: 0.0,
            duration,
        }
    }

    /// Current mix level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level being ramped towards
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the ramp is still moving
    pub fn is_active(&self) -> bool {
        self.level != self.target
    }

    /// Ramp towards fully wet (`true`) or dry (`false`)
    pub fn engage(&mut self, on: bool) {
        self.target = if on { 1.0 } else { 0.0 };
        if self.duration.is_zero() {
            self.level = self.target;
        }
    }

    /// Advance by `dt`; returns the new level if it changed
    pub fn advance(&mut self, dt: Duration) -> Option<f32> {
        if !self.is_active() {
            return None;
        }

        let step = if self.duration.is_zero() {
            1.0
        } else {
            (dt.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        self.level = if self.target > self.level {
            (self.level + step).min(self.target)
        } else {
            (self.level - step).max(self.target)
        };
        Some(self.level)
    }
}

/// Mix ramps for every effect in the rack
#[derive(Debug, Clone)]
pub struct EffectRack {
    ramps: [(EffectKind, MixRamp); 4],
}

impl EffectRack {
    /// Create a dry rack with the given ramp time
    pub fn new(ramp: Duration) -> Self {
        Self {
            ramps: EffectKind::ALL.map(|kind| (kind, MixRamp::new(ramp))),
        }
    }

    fn ramp_mut(&mut self, kind: EffectKind) -> &mut MixRamp {
        let idx = EffectKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &mut self.ramps[idx].1
    }

    /// Current mix level of an effect
    pub fn mix(&self, kind: EffectKind) -> f32 {
        self.ramps
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, ramp)| ramp.level())
            .unwrap_or(0.0)
    }

    /// Start ramping an effect in or out
    ///
    /// Returns the level to push immediately when the ramp time is zero.
    pub fn engage(&mut self, kind: EffectKind, on: bool) -> Option<(EffectParam, f32)> {
        let ramp = self.ramp_mut(kind);
        let before = ramp.level();
        ramp.engage(on);
        log::debug!("effect: {} mix -> {}", kind.name(), if on { "wet" } else { "dry" });
        (ramp.level() != before).then(|| (EffectParam::Mix(kind), ramp.level()))
    }

    /// Advance all ramps by `dt`, returning mix updates to push
    pub fn tick(&mut self, dt: Duration) -> Vec<(EffectParam, f32)> {
        self.ramps
            .iter_mut()
            .filter_map(|(kind, ramp)| ramp.advance(dt).map(|level| (EffectParam::Mix(*kind), level)))
            .collect()
    }

    /// Whether any ramp is still moving
    pub fn is_active(&self) -> bool {
        self.ramps.iter().any(|(_, ramp)| ramp.is_active())
    }
}
