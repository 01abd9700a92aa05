//! Screw Player - headless chop & screw player
//!
//! The control side of the player as a library, so it can be driven from the
//! terminal binary, tests, or a future GUI front end:
//! - [`session::Session`]: crossfader, chop, tempo, effects, brake
//! - [`app::App`]: session plus track library and gamepad
//! - [`commands::Command`]: the line-based terminal protocol
//! - [`engine::LogEngine`]: engine stand-in that logs every call

pub mod app;
pub mod commands;
pub mod config;
pub mod engine;
pub mod session;
