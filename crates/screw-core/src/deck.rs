//! Deck pair - the same source loaded twice, deck B trailing by one beat
//!
//! Both decks start at timeline position 0. Deck B carries the offset as an
//! internal clip trim, so its playback phase trails deck A by exactly one
//! quarter note at the base tempo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{beat_ms, is_valid_bpm, Deck};

/// Errors from loading a deck pair
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeckError {
    #[error("Base tempo must be between 1 and 1000 BPM, got {0}")]
    InvalidTempo(f64),

    #[error("Source {0:?} has zero length")]
    EmptySource(PathBuf),
}

/// Offset between the two decks in ms: one quarter note at `base_bpm`
pub fn track_offset_ms(base_bpm: f64) -> f64 {
    beat_ms(base_bpm)
}

/// Two decks on one source
#[derive(Debug, Clone, PartialEq)]
pub struct DeckPair {
    source: PathBuf,
    duration: Duration,
    offset_ms: f64,
}

impl DeckPair {
    /// Load a source into both decks at the given base tempo
    pub fn load(
        source: impl Into<PathBuf>,
        duration: Duration,
        base_bpm: f64,
    ) -> Result<Self, DeckError> {
        let source = source.into();
        if !is_valid_bpm(base_bpm) {
            return Err(DeckError::InvalidTempo(base_bpm));
        }
        if duration.is_zero() {
            return Err(DeckError::EmptySource(source));
        }

        let offset_ms = track_offset_ms(base_bpm);
        log::info!(
            "deck: loaded {:?} ({:.2}s) at {:.2} BPM, deck B offset {:.1} ms",
            source,
            duration.as_secs_f64(),
            base_bpm,
            offset_ms
        );

        Ok(Self {
            source,
            duration,
            offset_ms,
        })
    }

    /// Source file shared by both decks
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Source length shared by both decks
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Offset of deck B relative to deck A, in ms
    pub fn offset_ms(&self) -> f64 {
        self.offset_ms
    }

    /// Internal clip offset for a deck, in ms
    pub fn clip_offset_ms(&self, deck: Deck) -> f64 {
        match deck {
            Deck::A => 0.0,
            Deck::B => self.offset_ms,
        }
    }
}
