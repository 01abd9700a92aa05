//! Screw Core - control core for the chop & screw performance tool
//!
//! Two decks play the same source, the second one a beat behind. Everything
//! here is the control side: crossfader gain law, the chop button timing,
//! tempo sync, the effect rack and the vinyl brake. Audio itself runs in an
//! external engine reached through [`engine::DeckEngine`].

pub mod brake;
pub mod chop;
pub mod config;
pub mod crossfade;
pub mod deck;
pub mod effect;
pub mod engine;
pub mod library;
pub mod tempo;
pub mod timer;
pub mod types;

pub use types::*;
