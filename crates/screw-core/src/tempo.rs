//! Tempo sync - base tempo, live tempo and the playback ratio between them
//!
//! The base tempo is the BPM the loaded track was analysed at; the live tempo
//! is what the performer dials in. Everything downstream (waveform speed,
//! tempo-synced delay, chop hold) derives from these two numbers.

use serde::{Deserialize, Serialize};

use crate::types::{beat_ms, is_valid_bpm, DEFAULT_BPM};

/// Tolerance for matching a tempo preset
pub const PERCENTAGE_TOLERANCE: f64 = 0.001;

/// Errors from tempo changes
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TempoError {
    #[error("Base tempo must be between 1 and 1000 BPM, got {0}")]
    InvalidBase(f64),

    #[error("Live tempo must be between 1 and 1000 BPM, got {0}")]
    InvalidLive(f64),

    #[error("Base tempo {base} would put the live tempo at {live} BPM")]
    LiveOutOfRange { base: f64, live: f64 },

    #[error("Tempo percentage must be positive and finite, got {0}")]
    InvalidPercentage(f64),
}

/// Values to push downstream after a tempo change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoUpdate {
    /// New live tempo in BPM
    pub live_bpm: f64,
    /// Playback speed ratio live / base (waveform display speed)
    pub ratio: f64,
    /// Quarter-note delay time at the live tempo, in ms
    pub delay_ms: f64,
}

/// Base/live tempo pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoSync {
    base: f64,
    live: f64,
}

impl Default for TempoSync {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl TempoSync {
    /// Create with base and live tempo both at `bpm`
    ///
    /// Invalid values fall back to [`DEFAULT_BPM`].
    pub fn new(bpm: f64) -> Self {
        let bpm = if is_valid_bpm(bpm) { bpm } else { DEFAULT_BPM };
        Self {
            base: bpm,
            live: bpm,
        }
    }

    /// Base tempo in BPM
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Live tempo in BPM
    pub fn live(&self) -> f64 {
        self.live
    }

    /// Playback speed ratio live / base
    pub fn ratio(&self) -> f64 {
        self.live / self.base
    }

    /// Quarter-note delay time at the live tempo, in ms
    pub fn delay_ms(&self) -> f64 {
        beat_ms(self.live)
    }

    /// Snapshot of the values to push downstream
    pub fn update(&self) -> TempoUpdate {
        TempoUpdate {
            live_bpm: self.live,
            ratio: self.ratio(),
            delay_ms: self.delay_ms(),
        }
    }

    /// Set a new base tempo, keeping the live/base ratio
    ///
    /// Used on track load: a track screwed down to 80% stays at 80% of the new
    /// track's tempo. Rejected without changes if the carried ratio would
    /// push the live tempo out of range.
    pub fn set_base_tempo(&mut self, bpm: f64) -> Result<TempoUpdate, TempoError> {
        if !is_valid_bpm(bpm) {
            log::warn!("tempo: rejected base tempo {}", bpm);
            return Err(TempoError::InvalidBase(bpm));
        }

        let ratio = self.ratio();
        let live = bpm * ratio;
        if !is_valid_bpm(live) {
            log::warn!("tempo: base {} rejected, live tempo would be {}", bpm, live);
            return Err(TempoError::LiveOutOfRange { base: bpm, live });
        }

        self.base = bpm;
        self.live = live;
        log::debug!(
            "tempo: base {:.2} BPM, live {:.2} BPM (ratio {:.4})",
            self.base,
            self.live,
            ratio
        );
        Ok(self.update())
    }

    /// Set the live tempo
    pub fn set_live_tempo(&mut self, bpm: f64) -> Result<TempoUpdate, TempoError> {
        if !is_valid_bpm(bpm) {
            log::warn!("tempo: rejected live tempo {}", bpm);
            return Err(TempoError::InvalidLive(bpm));
        }

        self.live = bpm;
        Ok(self.update())
    }

    /// Set the live tempo as a fraction of the base tempo (1.0 = original)
    pub fn set_percentage(&mut self, percentage: f64) -> Result<TempoUpdate, TempoError> {
        if !(percentage.is_finite() && percentage > 0.0) {
            log::warn!("tempo: rejected tempo percentage {}", percentage);
            return Err(TempoError::InvalidPercentage(percentage));
        }
        self.set_live_tempo(self.base * percentage)
    }

    /// Whether the live tempo currently matches a preset percentage
    pub fn is_percentage_active(&self, percentage: f64) -> bool {
        (self.ratio() - percentage).abs() < PERCENTAGE_TOLERANCE
    }
}
