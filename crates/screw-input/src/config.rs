//! Gamepad configuration schema and loader
//!
//! Stored as YAML next to the player config.
//! Default location: ~/.config/screw/gamepad.yaml
//!
//! ```yaml
//! deadzone: 0.08
//! brake_release_threshold: 0.01
//! buttons:
//!   - button: south
//!     action: chop
//!   - button: dpad_up
//!     action:
//!       effect_hold: reverb
//! ```

use screw_core::config::{default_config_path, load_config};
use screw_core::effect::EffectKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::axis::DEFAULT_BRAKE_RELEASE_THRESHOLD;
use crate::types::GamepadButton;

/// What a button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Chop: toggle the crossfader on press and release
    Chop,
    /// Ramp an effect's wet mix up while held
    EffectHold(EffectKind),
}

/// One button assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub button: GamepadButton,
    pub action: ButtonAction,
}

impl ButtonBinding {
    pub fn new(button: GamepadButton, action: ButtonAction) -> Self {
        Self { button, action }
    }
}

/// Root gamepad configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Stick deadzone (0.0 - 0.99), applied before mapping
    pub deadzone: f32,

    /// Trigger values below this release the brake
    pub brake_release_threshold: f32,

    /// Button assignments; unlisted buttons do nothing
    pub buttons: Vec<ButtonBinding>,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.0,
            brake_release_threshold: DEFAULT_BRAKE_RELEASE_THRESHOLD,
            buttons: default_bindings(),
        }
    }
}

/// Stock layout: south chops, the d-pad holds effects
pub fn default_bindings() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding::new(GamepadButton::South, ButtonAction::Chop),
        ButtonBinding::new(GamepadButton::DpadUp, ButtonAction::EffectHold(EffectKind::Reverb)),
        ButtonBinding::new(GamepadButton::DpadRight, ButtonAction::EffectHold(EffectKind::Delay)),
        ButtonBinding::new(GamepadButton::DpadDown, ButtonAction::EffectHold(EffectKind::Flanger)),
    ]
}

/// Default gamepad config path
pub fn default_gamepad_config_path() -> PathBuf {
    default_config_path("gamepad.yaml")
}

/// Load the gamepad config, falling back to the stock layout
pub fn load_gamepad_config(path: &Path) -> GamepadConfig {
    load_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screw_core::config::parse_config;

    #[test]
    fn test_default_layout() {
        let config = GamepadConfig::default();
        assert_eq!(config.buttons.len(), 4);
        assert_eq!(config.buttons[0].action, ButtonAction::Chop);
        assert_eq!(config.brake_release_threshold, 0.01);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
deadzone: 0.1
buttons:
  - button: east
    action: chop
  - button: dpad_left
    action:
      effect_hold: phaser
"#;
        let config: GamepadConfig = parse_config(yaml).unwrap();
        assert_eq!(config.deadzone, 0.1);
        assert_eq!(config.brake_release_threshold, DEFAULT_BRAKE_RELEASE_THRESHOLD);
        assert_eq!(
            config.buttons,
            vec![
                ButtonBinding::new(GamepadButton::East, ButtonAction::Chop),
                ButtonBinding::new(
                    GamepadButton::DpadLeft,
                    ButtonAction::EffectHold(EffectKind::Phaser)
                ),
            ]
        );
    }

    #[test]
    fn test_default_serializes_readably() {
        let yaml = serde_yaml::to_string(&GamepadConfig::default()).unwrap();
        assert!(yaml.contains("button: south"));
        assert!(yaml.contains("action: chop"));
    }

    #[test]
    fn test_missing_file_uses_stock_layout() {
        let config = load_gamepad_config(Path::new("/nonexistent/gamepad.yaml"));
        assert_eq!(config, GamepadConfig::default());
    }
}
