//! Effect parameter targets
//!
//! The effects themselves live in the external engine. This module names the
//! parameters the control core drives as one closed set, so the axis mapper
//! and tempo sync address every effect through a single
//! [`DeckEngine::set_effect_param`](crate::engine::DeckEngine::set_effect_param)
//! call instead of checking each effect for presence.

mod ramp;

pub use ramp::{EffectRack, MixRamp};

use serde::{Deserialize, Serialize};

/// Maximum stick-driven modulation speed/depth (stick value × 10)
pub const MOD_SCALE: f32 = 10.0;

/// Upper bound for flanger width
pub const MAX_FLANGER_WIDTH: f32 = 0.99;

/// Upper bound for phaser feedback
pub const MAX_PHASER_FEEDBACK: f32 = 0.70;

/// Longest delay time the delay effect accepts, in ms
pub const MAX_DELAY_MS: f32 = 4000.0;

/// Effects hosted on the master bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Flanger,
    Phaser,
    Delay,
    Reverb,
}

impl EffectKind {
    /// All effects in rack order
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::Flanger,
        EffectKind::Phaser,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flanger => "Flanger",
            Self::Phaser => "Phaser",
            Self::Delay => "Delay",
            Self::Reverb => "Reverb",
        }
    }
}

/// A single controllable effect parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectParam {
    FlangerSpeed,
    FlangerDepth,
    FlangerWidth,
    PhaserRate,
    PhaserDepth,
    PhaserFeedback,
    /// Delay time in ms
    DelayTime,
    /// Wet mix level of an effect
    Mix(EffectKind),
}

impl EffectParam {
    /// Effect this parameter belongs to
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::FlangerSpeed | Self::FlangerDepth | Self::FlangerWidth => EffectKind::Flanger,
            Self::PhaserRate | Self::PhaserDepth | Self::PhaserFeedback => EffectKind::Phaser,
            Self::DelayTime => EffectKind::Delay,
            Self::Mix(kind) => *kind,
        }
    }

    /// Range and display information
    pub fn info(&self) -> ParamInfo {
        match self {
            Self::FlangerSpeed => ParamInfo::new("Speed", 0.0).with_range(-MOD_SCALE, MOD_SCALE),
            Self::FlangerDepth => ParamInfo::new("Depth", 0.0).with_range(-MOD_SCALE, MOD_SCALE),
            Self::FlangerWidth => ParamInfo::new("Width", 0.0).with_range(0.0, MAX_FLANGER_WIDTH),
            Self::PhaserRate => ParamInfo::new("Rate", 0.0).with_range(-MOD_SCALE, MOD_SCALE),
            Self::PhaserDepth => ParamInfo::new("Depth", 0.0).with_range(-MOD_SCALE, MOD_SCALE),
            Self::PhaserFeedback => {
                ParamInfo::new("Feedback", 0.0).with_range(0.0, MAX_PHASER_FEEDBACK)
            }
            Self::DelayTime => ParamInfo::new("Time", 500.0)
                .with_range(1.0, MAX_DELAY_MS)
                .with_unit("ms"),
            Self::Mix(_) => ParamInfo::new("Mix", 0.0).with_unit("%"),
        }
    }

    /// Clamp a value into this parameter's range
    pub fn clamp(&self, value: f32) -> f32 {
        self.info().clamp(value)
    }
}

impl std::fmt::Display for EffectParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind().name(), self.info().name)
    }
}

/// Information about an effect parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// Parameter name for display
    pub name: &'static str,
    /// Default value
    pub default: f32,
    /// Minimum value
    pub min: f32,
    /// Maximum value
    pub max: f32,
    /// Unit label (e.g., "ms", "%")
    pub unit: &'static str,
}

impl ParamInfo {
    /// Create a unit-range parameter with a name and default value
    pub fn new(name: &'static str, default: f32) -> Self {
        Self {
            name,
            default,
            min: 0.0,
            max: 1.0,
            unit: "",
        }
    }

    /// Set the value range
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the unit label
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default.clamp(self.min, self.max)
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_info() {
        let param = ParamInfo::new("Time", 500.0)
            .with_range(1.0, 4000.0)
            .with_unit("ms");

        assert_eq!(param.name, "Time");
        assert_eq!(param.default, 500.0);
        assert_eq!(param.min, 1.0);
        assert_eq!(param.max, 4000.0);
        assert_eq!(param.unit, "ms");
    }

    #[test]
    fn test_param_kind() {
        assert_eq!(EffectParam::FlangerWidth.kind(), EffectKind::Flanger);
        assert_eq!(EffectParam::PhaserFeedback.kind(), EffectKind::Phaser);
        assert_eq!(EffectParam::DelayTime.kind(), EffectKind::Delay);
        assert_eq!(EffectParam::Mix(EffectKind::Reverb).kind(), EffectKind::Reverb);
    }

    #[test]
    fn test_param_clamp() {
        assert_eq!(EffectParam::FlangerWidth.clamp(1.5), 0.99);
        assert_eq!(EffectParam::PhaserFeedback.clamp(1.0), 0.70);
        assert_eq!(EffectParam::FlangerSpeed.clamp(-12.0), -10.0);
        assert_eq!(EffectParam::DelayTime.clamp(0.0), 1.0);
        assert_eq!(EffectParam::Mix(EffectKind::Delay).clamp(f32::NAN), 0.0);
    }

    #[test]
    fn test_param_serde() {
        let yaml = serde_yaml::to_string(&EffectParam::Mix(EffectKind::Delay)).unwrap();
        let parsed: EffectParam = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, EffectParam::Mix(EffectKind::Delay));
    }

    #[test]
    fn test_display() {
        assert_eq!(EffectParam::PhaserRate.to_string(), "Phaser Rate");
    }
}
