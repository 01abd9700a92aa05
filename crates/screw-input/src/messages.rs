//! Control messages produced by the input layer
//!
//! These are what the session consumes. They carry no gamepad detail, so an
//! on-screen control can emit the same messages as the controller.

use std::time::Instant;

use screw_core::effect::{EffectKind, EffectParam};

/// A control action for the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    /// Chop button went down
    ChopPress,
    /// Chop button came up
    ChopRelease,
    /// Effect hold button: ramp the wet mix up (engaged) or down
    EffectHold { kind: EffectKind, engaged: bool },
    /// Direct effect parameter value
    Effect { param: EffectParam, value: f32 },
    /// Direct brake amount (0.0 = running, 1.0 = stopped)
    Brake(f32),
    /// Let go of the brake: spring back to zero
    BrakeSpring,
}

/// A control message with the time its input event happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedMessage {
    pub message: ControlMessage,
    pub at: Instant,
}
