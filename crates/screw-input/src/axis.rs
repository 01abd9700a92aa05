//! Stick and trigger mapping
//!
//! Each stick drives one modulation effect. The backend reports the two
//! stick axes as independent events, so the mapper remembers the last value
//! of every axis and recombines them:
//!
//! ```text
//! left stick   x → flanger speed (x·10)    y → flanger depth (y·10)
//!              |v| → flanger width  ((|v|/√2)², max 0.99)
//! right stick  x → phaser rate (x·10)      y → phaser depth (y·10)
//!              |v| → phaser feedback (|v|, max 0.70)
//! right trigger → vinyl brake, spring back on release
//! ```

use screw_core::effect::{EffectParam, MAX_FLANGER_WIDTH, MAX_PHASER_FEEDBACK, MOD_SCALE};

use crate::messages::ControlMessage;
use crate::types::GamepadAxis;

/// Trigger values below this count as released
pub const DEFAULT_BRAKE_RELEASE_THRESHOLD: f32 = 0.01;

/// Position of one stick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickVector {
    pub x: f32,
    pub y: f32,
}

impl StickVector {
    /// Euclidean distance from center (0..=√2)
    pub fn distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance scaled to 0..=1
    pub fn normalized_distance(&self) -> f32 {
        (self.distance() / std::f32::consts::SQRT_2).min(1.0)
    }
}

/// Result of mapping one axis event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisAction {
    /// Set an effect parameter
    Param { param: EffectParam, value: f32 },
    /// Set the brake amount
    Brake(f32),
    /// Start the brake spring-back
    BrakeSpring,
}

impl From<AxisAction> for ControlMessage {
    fn from(action: AxisAction) -> Self {
        match action {
            AxisAction::Param { param, value } => ControlMessage::Effect { param, value },
            AxisAction::Brake(amount) => ControlMessage::Brake(amount),
            AxisAction::BrakeSpring => ControlMessage::BrakeSpring,
        }
    }
}

/// Combines axis events into effect and brake actions
#[derive(Debug, Clone)]
pub struct GamepadAxisMapper {
    left: StickVector,
    right: StickVector,
    /// Last brake amount sent
    brake: f32,
    release_threshold: f32,
}

impl Default for GamepadAxisMapper {
    fn default() -> Self {
        Self::new(DEFAULT_BRAKE_RELEASE_THRESHOLD)
    }
}

impl GamepadAxisMapper {
    /// Create a mapper with sticks centered and the brake off
    pub fn new(release_threshold: f32) -> Self {
        Self {
            left: StickVector::default(),
            right: StickVector::default(),
            brake: 0.0,
            release_threshold,
        }
    }

    /// Current left stick position
    pub fn left(&self) -> StickVector {
        self.left
    }

    /// Current right stick position
    pub fn right(&self) -> StickVector {
        self.right
    }

    /// Map one normalized axis value
    pub fn on_axis(&mut self, axis: GamepadAxis, value: f32) -> Vec<AxisAction> {
        match axis {
            GamepadAxis::LeftX => {
                self.left.x = value;
                vec![
                    param(EffectParam::FlangerSpeed, value * MOD_SCALE),
                    self.flanger_width(),
                ]
            }
            GamepadAxis::LeftY => {
                self.left.y = value;
                vec![
                    param(EffectParam::FlangerDepth, value * MOD_SCALE),
                    self.flanger_width(),
                ]
            }
            GamepadAxis::RightX => {
                self.right.x = value;
                vec![
                    param(EffectParam::PhaserRate, value * MOD_SCALE),
                    self.phaser_feedback(),
                ]
            }
            GamepadAxis::RightY => {
                self.right.y = value;
                vec![
                    param(EffectParam::PhaserDepth, value * MOD_SCALE),
                    self.phaser_feedback(),
                ]
            }
            GamepadAxis::RightTrigger => self.on_brake(value),
            GamepadAxis::LeftTrigger => Vec::new(),
        }
    }

    fn flanger_width(&self) -> AxisAction {
        let d = self.left.normalized_distance();
        param(EffectParam::FlangerWidth, (d * d).clamp(0.0, MAX_FLANGER_WIDTH))
    }

    fn phaser_feedback(&self) -> AxisAction {
        param(
            EffectParam::PhaserFeedback,
            self.right.distance().clamp(0.0, MAX_PHASER_FEEDBACK),
        )
    }

    fn on_brake(&mut self, value: f32) -> Vec<AxisAction> {
        if value < self.release_threshold && self.brake > 0.0 {
            self.brake = 0.0;
            return vec![AxisAction::BrakeSpring];
        }
        self.brake = value;
        vec![AxisAction::Brake(value)]
    }
}

fn param(param: EffectParam, value: f32) -> AxisAction {
    AxisAction::Param { param, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(actions: &[AxisAction], wanted: EffectParam) -> Option<f32> {
        actions.iter().find_map(|a| match a {
            AxisAction::Param { param, value } if *param == wanted => Some(*value),
            _ => None,
        })
    }

    #[test]
    fn test_left_stick_drives_flanger() {
        let mut mapper = GamepadAxisMapper::default();

        let actions = mapper.on_axis(GamepadAxis::LeftX, 0.5);
        assert_eq!(value_of(&actions, EffectParam::FlangerSpeed), Some(5.0));
        let width = value_of(&actions, EffectParam::FlangerWidth).unwrap();
        assert!((width - 0.125).abs() < 1e-6);

        let actions = mapper.on_axis(GamepadAxis::LeftY, -1.0);
        assert_eq!(value_of(&actions, EffectParam::FlangerDepth), Some(-10.0));
        assert_eq!(value_of(&actions, EffectParam::FlangerSpeed), None);
        assert!(value_of(&actions, EffectParam::FlangerWidth).is_some());
    }

    #[test]
    fn test_flanger_width_capped() {
        let mut mapper = GamepadAxisMapper::default();
        mapper.on_axis(GamepadAxis::LeftX, 1.0);
        let actions = mapper.on_axis(GamepadAxis::LeftY, 1.0);
        assert_eq!(value_of(&actions, EffectParam::FlangerWidth), Some(MAX_FLANGER_WIDTH));
    }

    #[test]
    fn test_flanger_width_along_axis_and_center() {
        let mut mapper = GamepadAxisMapper::default();

        let actions = mapper.on_axis(GamepadAxis::LeftX, 1.0);
        let width = value_of(&actions, EffectParam::FlangerWidth).unwrap();
        assert!((width - 0.5).abs() < 1e-6);

        mapper.on_axis(GamepadAxis::LeftY, 0.4);
        mapper.on_axis(GamepadAxis::LeftX, 0.0);
        let actions = mapper.on_axis(GamepadAxis::LeftY, 0.0);
        assert_eq!(value_of(&actions, EffectParam::FlangerWidth), Some(0.0));
        assert_eq!(value_of(&actions, EffectParam::FlangerDepth), Some(0.0));
    }

    #[test]
    fn test_phaser_feedback_zero_at_center() {
        let mut mapper = GamepadAxisMapper::default();
        mapper.on_axis(GamepadAxis::RightX, 0.5);
        mapper.on_axis(GamepadAxis::RightY, -0.5);

        mapper.on_axis(GamepadAxis::RightX, 0.0);
        let actions = mapper.on_axis(GamepadAxis::RightY, 0.0);
        assert_eq!(value_of(&actions, EffectParam::PhaserFeedback), Some(0.0));
        assert_eq!(value_of(&actions, EffectParam::PhaserDepth), Some(0.0));
    }

    #[test]
    fn test_right_stick_drives_phaser() {
        let mut mapper = GamepadAxisMapper::default();

        let actions = mapper.on_axis(GamepadAxis::RightX, 0.3);
        let rate = value_of(&actions, EffectParam::PhaserRate).unwrap();
        assert!((rate - 3.0).abs() < 1e-5);
        let feedback = value_of(&actions, EffectParam::PhaserFeedback).unwrap();
        assert!((feedback - 0.3).abs() < 1e-6);

        let actions = mapper.on_axis(GamepadAxis::RightY, 0.9);
        let depth = value_of(&actions, EffectParam::PhaserDepth).unwrap();
        assert!((depth - 9.0).abs() < 1e-5);
        assert_eq!(value_of(&actions, EffectParam::PhaserFeedback), Some(MAX_PHASER_FEEDBACK));
    }

    #[test]
    fn test_brake_spring_is_edge_triggered() {
        let mut mapper = GamepadAxisMapper::default();

        assert_eq!(
            mapper.on_axis(GamepadAxis::RightTrigger, 0.0),
            vec![AxisAction::Brake(0.0)]
        );
        assert_eq!(
            mapper.on_axis(GamepadAxis::RightTrigger, 0.8),
            vec![AxisAction::Brake(0.8)]
        );
        assert_eq!(
            mapper.on_axis(GamepadAxis::RightTrigger, 0.005),
            vec![AxisAction::BrakeSpring]
        );
        // Already released: a second low reading is a plain set, not another spring
        assert_eq!(
            mapper.on_axis(GamepadAxis::RightTrigger, 0.0),
            vec![AxisAction::Brake(0.0)]
        );
    }

    #[test]
    fn test_left_trigger_ignored() {
        let mut mapper = GamepadAxisMapper::default();
        assert!(mapper.on_axis(GamepadAxis::LeftTrigger, 1.0).is_empty());
    }

    #[test]
    fn test_stick_distance() {
        let v = StickVector { x: 1.0, y: 1.0 };
        assert!((v.distance() - std::f32::consts::SQRT_2).abs() < 1e-6);
        assert!((v.normalized_distance() - 1.0).abs() < 1e-6);
    }
}
