//! Deck engine collaborator
//!
//! The audio engine (mixing, time-stretching, effect hosting, transport) is
//! external. The control core only issues fire-and-forget parameter updates
//! through [`DeckEngine`]. Failures are reported as [`EngineError`] but never
//! propagated: call sites go through [`apply`], which logs and moves on.

#[cfg(any(test, feature = "test-util"))]
mod recording;

#[cfg(any(test, feature = "test-util"))]
pub use recording::{EngineCall, RecordingEngine};

use std::path::Path;
use std::time::Duration;

use crate::effect::{EffectKind, EffectParam};
use crate::types::Deck;

/// Error type for engine calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Track for deck {0} is not available")]
    TrackUnavailable(Deck),

    #[error("{} effect is not available", .0.name())]
    EffectUnavailable(EffectKind),

    #[error("No source loaded")]
    NoSource,

    #[error("Engine error: {0}")]
    Backend(String),
}

/// Result of an engine call
pub type EngineResult = Result<(), EngineError>;

/// Transport/mixer collaborator driven by the control core
///
/// All calls are non-blocking parameter updates.
pub trait DeckEngine {
    /// Load the source into a deck's track
    fn load_source(&mut self, deck: Deck, source: &Path, length: Duration) -> EngineResult;

    /// Set a deck's track volume in dB
    fn set_track_volume(&mut self, deck: Deck, db: f32) -> EngineResult;

    /// Set a deck's internal clip offset (trim) in ms
    fn set_clip_offset(&mut self, deck: Deck, offset_ms: f64) -> EngineResult;

    /// Set the playback tempo in BPM
    fn set_tempo(&mut self, bpm: f64) -> EngineResult;

    /// Set the tempo-synced delay time in ms
    fn set_delay_time(&mut self, ms: f64) -> EngineResult;

    /// Set the waveform display speed ratio (live / base)
    fn set_waveform_speed_ratio(&mut self, ratio: f64) -> EngineResult;

    /// Set an effect parameter
    fn set_effect_param(&mut self, param: EffectParam, value: f32) -> EngineResult;

    /// Set the vinyl brake amount (0.0 = running, 1.0 = stopped)
    fn set_brake(&mut self, amount: f32) -> EngineResult;

    /// Start playback
    fn play(&mut self) -> EngineResult;

    /// Stop playback, ending any recording pass
    fn stop(&mut self) -> EngineResult;

    /// Arm or disarm a deck's track for recording
    fn arm_track(&mut self, deck: Deck, armed: bool) -> EngineResult;

    /// Start the transport recording into armed tracks
    fn record(&mut self) -> EngineResult;

    /// Return the transport to the start
    fn rewind(&mut self) -> EngineResult;
}

/// Swallow an engine failure at the call site
///
/// Returns true if the call succeeded.
pub fn apply(what: &str, result: EngineResult) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::debug!("engine: {} ignored: {}", what, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_swallows_errors() {
        assert!(apply("volume", Ok(())));
        assert!(!apply("volume", Err(EngineError::TrackUnavailable(Deck::B))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::EffectUnavailable(EffectKind::Phaser).to_string(),
            "Phaser effect is not available"
        );
        assert_eq!(
            EngineError::TrackUnavailable(Deck::A).to_string(),
            "Track for deck A is not available"
        );
    }
}
