//! Gamepad input types
//!
//! Button and axis ids follow the SDL game controller numbering, so events
//! from any SDL-style backend can be resolved without a translation table.

use serde::{Deserialize, Serialize};

/// Gamepad buttons (SDL game controller ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl GamepadButton {
    /// All buttons in id order
    pub const ALL: [GamepadButton; 15] = [
        Self::South,
        Self::East,
        Self::West,
        Self::North,
        Self::Back,
        Self::Guide,
        Self::Start,
        Self::LeftStick,
        Self::RightStick,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::DpadUp,
        Self::DpadDown,
        Self::DpadLeft,
        Self::DpadRight,
    ];

    /// SDL button id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Button for an SDL id, `None` for ids we don't know
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

/// Gamepad axes (SDL game controller ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    /// All axes in id order
    pub const ALL: [GamepadAxis; 6] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    /// SDL axis id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Axis for an SDL id, `None` for ids we don't know
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Whether this is a trigger (unipolar 0..1) rather than a stick axis
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::LeftTrigger | Self::RightTrigger)
    }
}

/// A normalized gamepad event
///
/// Stick values are in [-1, 1], trigger values in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonPressed(GamepadButton),
    ButtonReleased(GamepadButton),
    AxisMoved { axis: GamepadAxis, value: f32 },
}

/// Event as delivered by a gamepad backend, before id resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInputEvent {
    ButtonDown(u8),
    ButtonUp(u8),
    /// Axis id and already-normalized value
    Axis(u8, f32),
}

impl RawInputEvent {
    /// Resolve SDL ids, dropping events for unknown buttons or axes
    pub fn resolve(self) -> Option<InputEvent> {
        match self {
            Self::ButtonDown(id) => GamepadButton::from_id(id).map(InputEvent::ButtonPressed),
            Self::ButtonUp(id) => GamepadButton::from_id(id).map(InputEvent::ButtonReleased),
            Self::Axis(id, value) => {
                let axis = GamepadAxis::from_id(id)?;
                let (min, max) = if axis.is_trigger() { (0.0, 1.0) } else { (-1.0, 1.0) };
                let value = if value.is_nan() { 0.0 } else { value.clamp(min, max) };
                Some(InputEvent::AxisMoved { axis, value })
            }
        }
    }
}

/// Error parsing a textual raw event
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseEventError {
    #[error("Empty event")]
    Empty,

    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: Option<&str>,
) -> Result<T, ParseEventError> {
    let value = value.ok_or(ParseEventError::Missing(field))?;
    value.parse().map_err(|_| ParseEventError::Invalid {
        field,
        value: value.to_string(),
    })
}

/// Text form used by scripted and terminal backends
///
/// `down <id>`, `up <id>`, `axis <id> <value>`.
impl std::str::FromStr for RawInputEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or(ParseEventError::Empty)?;
        match kind {
            "down" => Ok(Self::ButtonDown(parse_field("button id", parts.next())?)),
            "up" => Ok(Self::ButtonUp(parse_field("button id", parts.next())?)),
            "axis" => {
                let id = parse_field("axis id", parts.next())?;
                let value = parse_field("axis value", parts.next())?;
                Ok(Self::Axis(id, value))
            }
            other => Err(ParseEventError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_ids_roundtrip() {
        for button in GamepadButton::ALL {
            assert_eq!(GamepadButton::from_id(button.id()), Some(button));
        }
        assert_eq!(GamepadButton::South.id(), 0);
        assert_eq!(GamepadButton::DpadUp.id(), 11);
        assert_eq!(GamepadButton::DpadRight.id(), 14);
        assert_eq!(GamepadButton::from_id(15), None);
    }

    #[test]
    fn test_axis_ids() {
        assert_eq!(GamepadAxis::from_id(5), Some(GamepadAxis::RightTrigger));
        assert_eq!(GamepadAxis::from_id(6), None);
        assert!(GamepadAxis::LeftTrigger.is_trigger());
        assert!(!GamepadAxis::RightY.is_trigger());
    }

    #[test]
    fn test_resolve_unknown_ids_dropped() {
        assert_eq!(RawInputEvent::ButtonDown(42).resolve(), None);
        assert_eq!(RawInputEvent::Axis(9, 0.5).resolve(), None);
        assert_eq!(
            RawInputEvent::ButtonUp(0).resolve(),
            Some(InputEvent::ButtonReleased(GamepadButton::South))
        );
    }

    #[test]
    fn test_parse_text_events() {
        assert_eq!("down 0".parse::<RawInputEvent>(), Ok(RawInputEvent::ButtonDown(0)));
        assert_eq!("up 14".parse::<RawInputEvent>(), Ok(RawInputEvent::ButtonUp(14)));
        assert_eq!("axis 5 0.75".parse::<RawInputEvent>(), Ok(RawInputEvent::Axis(5, 0.75)));
        assert_eq!("".parse::<RawInputEvent>(), Err(ParseEventError::Empty));
        assert_eq!(
            "axis 2".parse::<RawInputEvent>(),
            Err(ParseEventError::Missing("axis value"))
        );
        assert!(matches!(
            "down x".parse::<RawInputEvent>(),
            Err(ParseEventError::Invalid { field: "button id", .. })
        ));
        assert!(matches!(
            "wiggle 1".parse::<RawInputEvent>(),
            Err(ParseEventError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_resolve_clamps_axis_values() {
        assert_eq!(
            RawInputEvent::Axis(5, -0.3).resolve(),
            Some(InputEvent::AxisMoved { axis: GamepadAxis::RightTrigger, value: 0.0 })
        );
        assert_eq!(
            RawInputEvent::Axis(0, 1.7).resolve(),
            Some(InputEvent::AxisMoved { axis: GamepadAxis::LeftX, value: 1.0 })
        );
    }
}
