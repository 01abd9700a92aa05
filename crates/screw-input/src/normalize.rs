//! Value normalization for gamepad controls
//!
//! Backends report sticks and triggers as signed 16-bit integers:
//! - Sticks: -32768 to 32767, centered at 0
//! - Triggers: 0 to 32767 (negative values are noise)
//!
//! The control core only accepts normalized values, so clamping happens here.

/// Largest positive raw axis value
const RAW_MAX: f32 = i16::MAX as f32;

/// Normalize a raw stick axis to -1.0..=1.0
pub fn normalize_stick(raw: i16) -> f32 {
    // i16::MIN is one step past -RAW_MAX
    (raw as f32 / RAW_MAX).clamp(-1.0, 1.0)
}

/// Normalize a raw trigger axis to 0.0..=1.0
pub fn normalize_trigger(raw: i16) -> f32 {
    (raw as f32 / RAW_MAX).clamp(0.0, 1.0)
}

/// Snap small values to zero and rescale the rest
///
/// Values inside `deadzone` become 0.0; outside it the remaining travel is
/// stretched back to the full range so the edge of the deadzone doesn't jump.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    let deadzone = deadzone.clamp(0.0, 0.99);
    let magnitude = value.abs();
    if magnitude <= deadzone {
        return 0.0;
    }
    let scaled = (magnitude - deadzone) / (1.0 - deadzone);
    scaled.min(1.0).copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_range() {
        assert_eq!(normalize_stick(0), 0.0);
        assert_eq!(normalize_stick(i16::MAX), 1.0);
        assert_eq!(normalize_stick(i16::MIN), -1.0);
        assert!((normalize_stick(16384) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_trigger_range() {
        assert_eq!(normalize_trigger(0), 0.0);
        assert_eq!(normalize_trigger(i16::MAX), 1.0);
        assert_eq!(normalize_trigger(-500), 0.0);
    }

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.05, 0.1), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.1), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.1), 1.0);
        assert_eq!(apply_deadzone(-1.0, 0.1), -1.0);
        assert!((apply_deadzone(0.55, 0.1) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_zero_deadzone_is_identity() {
        assert_eq!(apply_deadzone(0.3, 0.0), 0.3);
        assert_eq!(apply_deadzone(-0.7, 0.0), -0.7);
    }
}
