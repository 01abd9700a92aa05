//! Input-to-control mapping
//!
//! Maps resolved gamepad events to [`ControlMessage`]s using the button
//! layout from [`GamepadConfig`] and the stick/trigger rules of
//! [`GamepadAxisMapper`].

use std::collections::HashMap;

use crate::axis::GamepadAxisMapper;
use crate::config::{ButtonAction, GamepadConfig};
use crate::messages::ControlMessage;
use crate::normalize::apply_deadzone;
use crate::types::{GamepadButton, InputEvent};

/// Button → action lookup
#[derive(Debug, Clone, Default)]
pub struct ButtonMapping {
    actions: HashMap<GamepadButton, ButtonAction>,
}

impl ButtonMapping {
    /// Build from config bindings; later bindings for a button win
    pub fn from_config(config: &GamepadConfig) -> Self {
        let mut actions = HashMap::new();
        for binding in &config.buttons {
            if let Some(previous) = actions.insert(binding.button, binding.action) {
                log::warn!(
                    "input: {:?} bound twice, {:?} replaced by {:?}",
                    binding.button,
                    previous,
                    binding.action
                );
            }
        }
        Self { actions }
    }

    /// Action bound to a button
    pub fn action(&self, button: GamepadButton) -> Option<ButtonAction> {
        self.actions.get(&button).copied()
    }

    /// Message for a button edge, `None` if unmapped
    pub fn map(&self, button: GamepadButton, pressed: bool) -> Option<ControlMessage> {
        let message = match self.action(button)? {
            ButtonAction::Chop if pressed => ControlMessage::ChopPress,
            ButtonAction::Chop => ControlMessage::ChopRelease,
            ButtonAction::EffectHold(kind) => ControlMessage::EffectHold {
                kind,
                engaged: pressed,
            },
        };
        Some(message)
    }
}

/// Turns gamepad events into control messages
#[derive(Debug, Clone)]
pub struct InputRouter {
    buttons: ButtonMapping,
    axes: GamepadAxisMapper,
    deadzone: f32,
}

impl InputRouter {
    /// Create a router from config
    pub fn new(config: &GamepadConfig) -> Self {
        Self {
            buttons: ButtonMapping::from_config(config),
            axes: GamepadAxisMapper::new(config.brake_release_threshold),
            deadzone: config.deadzone,
        }
    }

    /// Route one event
    ///
    /// Axis events may yield several messages (e.g. speed plus width).
    /// Unmapped buttons yield none.
    pub fn route(&mut self, event: InputEvent) -> Vec<ControlMessage> {
        match event {
            InputEvent::ButtonPressed(button) => self.buttons.map(button, true).into_iter().collect(),
            InputEvent::ButtonReleased(button) => {
                self.buttons.map(button, false).into_iter().collect()
            }
            InputEvent::AxisMoved { axis, value } => {
                let value = if axis.is_trigger() {
                    value
                } else {
                    apply_deadzone(value, self.deadzone)
                };
                self.axes
                    .on_axis(axis, value)
                    .into_iter()
                    .map(ControlMessage::from)
                    .collect()
            }
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(&GamepadConfig::default())
    }
}
