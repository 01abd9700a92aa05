//! Gamepad controller support for the screw player
//!
//! This crate provides:
//! - SDL-numbered button and axis types, raw event resolution
//! - Stick/trigger normalization and deadzones
//! - Configurable button layout (YAML) and stick-to-effect mapping
//! - An event hub with per-subscriber bounded queues
//!
//! # Architecture
//!
//! ```text
//! backend → RawInputEvent::resolve() → InputHub::publish() → Subscription
//!         → Gamepad::poll() → InputRouter::route() → ControlMessage → session
//! ```
//!
//! The backend callback is synchronous; the hub only ever uses `try_send`, so
//! a stalled consumer can't block it.

mod axis;
mod config;
mod hub;
mod mapping;
mod messages;
mod normalize;
mod types;

pub use axis::{AxisAction, GamepadAxisMapper, StickVector, DEFAULT_BRAKE_RELEASE_THRESHOLD};
pub use config::{
    default_bindings, default_gamepad_config_path, load_gamepad_config, ButtonAction,
    ButtonBinding, GamepadConfig,
};
pub use hub::{InputHub, Subscription, TimedEvent, DEFAULT_QUEUE_CAPACITY};
pub use mapping::{ButtonMapping, InputRouter};
pub use messages::{ControlMessage, TimedMessage};
pub use normalize::{apply_deadzone, normalize_stick, normalize_trigger};
pub use types::{GamepadAxis, GamepadButton, InputEvent, ParseEventError, RawInputEvent};

use std::path::Path;

/// Gamepad manager
///
/// Owns a hub subscription and the router. The backend publishes to the hub;
/// the application polls once per tick.
#[derive(Debug)]
pub struct Gamepad {
    config: GamepadConfig,
    router: InputRouter,
    subscription: Subscription,
}

impl Gamepad {
    /// Create from a config file (stock layout if missing)
    pub fn new(hub: &InputHub, config_path: Option<&Path>) -> Self {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(default_gamepad_config_path);
        Self::with_config(hub, load_gamepad_config(&config_path))
    }

    /// Create from an already loaded config
    pub fn with_config(hub: &InputHub, config: GamepadConfig) -> Self {
        log::info!(
            "input: {} button bindings, deadzone {:.2}",
            config.buttons.len(),
            config.deadzone
        );
        Self {
            router: InputRouter::new(&config),
            subscription: hub.subscribe(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GamepadConfig {
        &self.config
    }

    /// Drain pending events and map them to control messages
    ///
    /// Each message carries the publish time of the event it came from.
    pub fn poll(&mut self) -> Vec<TimedMessage> {
        let mut messages = Vec::new();
        for TimedEvent { event, at } in self.subscription.drain() {
            let routed = self.router.route(event);
            if routed.is_empty() {
                log::trace!("input: {:?} not mapped", event);
            }
            messages.extend(routed.into_iter().map(|message| TimedMessage { message, at }));
        }
        messages
    }
}
