//! Common types for screw
//!
//! Deck identifiers and the shared constants used by the crossfade, chop and
//! tempo components.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of decks (two decks playing the same source, one trailing the other)
pub const NUM_DECKS: usize = 2;

/// Tempo used when a track has no usable BPM
pub const DEFAULT_BPM: f64 = 120.0;

/// Slowest tempo accepted anywhere (one beat lasts a minute)
pub const MIN_BPM: f64 = 1.0;

/// Fastest tempo accepted anywhere
pub const MAX_BPM: f64 = 1000.0;

/// Gain floor in dB, treated as silence
pub const SILENCE_DB: f32 = -60.0;

/// Rate of the control tick (crossfader ramps, brake spring, timer polling)
pub const TICK_HZ: u32 = 30;

/// Interval between control ticks
pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / TICK_HZ as u64);

/// Deck identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deck {
    /// Leading deck, audible at crossfader position 0.0
    A,
    /// Trailing deck, audible at crossfader position 1.0
    B,
}

impl Deck {
    /// Both decks in track order
    pub const ALL: [Deck; NUM_DECKS] = [Deck::A, Deck::B];

    /// Track index in the engine (0 or 1)
    pub fn index(self) -> usize {
        match self {
            Deck::A => 0,
            Deck::B => 1,
        }
    }

    /// Convert from track index
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Deck::A),
            1 => Some(Deck::B),
            _ => None,
        }
    }

    /// The other deck of the pair
    pub fn other(self) -> Self {
        match self {
            Deck::A => Deck::B,
            Deck::B => Deck::A,
        }
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deck::A => write!(f, "A"),
            Deck::B => write!(f, "B"),
        }
    }
}

/// Whether a tempo lies within [`MIN_BPM`]..=[`MAX_BPM`]
///
/// NaN and infinities are rejected.
#[inline]
pub fn is_valid_bpm(bpm: f64) -> bool {
    (MIN_BPM..=MAX_BPM).contains(&bpm)
}

/// Duration of one beat (quarter note) in milliseconds
///
/// Callers guarantee `bpm > 0`; tempo validation lives in [`crate::tempo`].
#[inline]
pub fn beat_ms(bpm: f64) -> f64 {
    (60.0 / bpm) * 1000.0
}
