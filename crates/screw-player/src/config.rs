//! Player configuration for screw-player
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/screw/player.yaml

use screw_core::config::default_config_path as config_file_path;
use screw_core::DEFAULT_BPM;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use screw_core::config::{load_config, save_config};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Tempo settings (fallback BPM, screw presets)
    pub tempo: TempoConfig,
    /// Effect mix ramp settings
    pub effects: EffectsConfig,
    /// Vinyl brake settings
    pub brake: BrakeConfig,
    /// Gamepad config file; None uses ~/.config/screw/gamepad.yaml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamepad_config: Option<PathBuf>,
    /// Start playback as soon as a track is loaded
    pub auto_play: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tempo: TempoConfig::default(),
            effects: EffectsConfig::default(),
            brake: BrakeConfig::default(),
            gamepad_config: None,
            auto_play: true,
        }
    }
}

/// Tempo configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// BPM used when detection fails or nothing is loaded
    pub default_bpm: f64,
    /// Screw presets as fractions of the base tempo
    pub presets: Vec<f64>,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            default_bpm: DEFAULT_BPM,
            presets: vec![0.8, 0.9, 1.0],
        }
    }
}

/// Effect configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Time for a held effect's wet mix to go fully in or out
    pub mix_ramp_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { mix_ramp_ms: 300 }
    }
}

impl EffectsConfig {
    pub fn mix_ramp(&self) -> Duration {
        Duration::from_millis(self.mix_ramp_ms)
    }
}

/// Brake configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeConfig {
    /// Spring-back time after the trigger is released
    pub spring_ms: u64,
}

impl Default for BrakeConfig {
    fn default() -> Self {
        Self { spring_ms: 500 }
    }
}

impl BrakeConfig {
    pub fn spring(&self) -> Duration {
        Duration::from_millis(self.spring_ms)
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/screw/player.yaml
pub fn default_config_path() -> PathBuf {
    config_file_path("player.yaml")
}
