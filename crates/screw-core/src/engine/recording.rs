//! In-memory engine that records every call
//!
//! Test double for code driving a [`DeckEngine`]; enabled in dependent
//! crates through the `test-util` feature. Decks and effects can be marked
//! unavailable to exercise the swallow-on-failure paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{DeckEngine, EngineError, EngineResult};
use crate::effect::{EffectKind, EffectParam};
use crate::types::Deck;

/// A recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    LoadSource { deck: Deck, source: PathBuf, length: Duration },
    TrackVolume { deck: Deck, db: f32 },
    ClipOffset { deck: Deck, offset_ms: f64 },
    Tempo(f64),
    DelayTime(f64),
    WaveformSpeed(f64),
    EffectParam { param: EffectParam, value: f32 },
    Brake(f32),
    Play,
    Stop,
    Rewind,
    Arm { deck: Deck, armed: bool },
    Record,
}

/// Engine double recording successful calls in order
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    missing_decks: HashSet<Deck>,
    missing_effects: HashSet<EffectKind>,
    playing: bool,
    armed: HashSet<Deck>,
    recording: bool,
}

impl RecordingEngine {
    /// Create an engine with both decks and all effects available
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls targeting a deck fail
    pub fn remove_deck(&mut self, deck: Deck) {
        self.missing_decks.insert(deck);
    }

    /// Make calls targeting an effect fail
    pub fn remove_effect(&mut self, kind: EffectKind) {
        self.missing_effects.insert(kind);
    }

    /// All recorded calls
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Whether the transport is running
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the transport is recording
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Whether a deck's track is armed
    pub fn is_armed(&self, deck: Deck) -> bool {
        self.armed.contains(&deck)
    }

    /// Most recent volume sent to a deck
    pub fn last_volume(&self, deck: Deck) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::TrackVolume { deck: d, db } if *d == deck => Some(*db),
            _ => None,
        })
    }

    /// Most recent value sent to an effect parameter
    pub fn last_param(&self, param: EffectParam) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::EffectParam { param: p, value } if *p == param => Some(*value),
            _ => None,
        })
    }

    /// Most recent delay time
    pub fn last_delay_time(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::DelayTime(ms) => Some(*ms),
            _ => None,
        })
    }

    /// Most recent waveform speed ratio
    pub fn last_waveform_speed(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::WaveformSpeed(ratio) => Some(*ratio),
            _ => None,
        })
    }

    /// Most recent brake amount
    pub fn last_brake(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match call {
            EngineCall::Brake(amount) => Some(*amount),
            _ => None,
        })
    }

    fn deck_call(&mut self, deck: Deck, call: EngineCall) -> EngineResult {
        if self.missing_decks.contains(&deck) {
            return Err(EngineError::TrackUnavailable(deck));
        }
        self.calls.push(call);
        Ok(())
    }

    fn push(&mut self, call: EngineCall) -> EngineResult {
        self.calls.push(call);
        Ok(())
    }
}

impl DeckEngine for RecordingEngine {
    fn load_source(&mut self, deck: Deck, source: &Path, length: Duration) -> EngineResult {
        self.deck_call(
            deck,
            EngineCall::LoadSource {
                deck,
                source: source.to_path_buf(),
                length,
            },
        )
    }

    fn set_track_volume(&mut self, deck: Deck, db: f32) -> EngineResult {
        self.deck_call(deck, EngineCall::TrackVolume { deck, db })
    }

    fn set_clip_offset(&mut self, deck: Deck, offset_ms: f64) -> EngineResult {
        self.deck_call(deck, EngineCall::ClipOffset { deck, offset_ms })
    }

    fn set_tempo(&mut self, bpm: f64) -> EngineResult {
        self.push(EngineCall::Tempo(bpm))
    }

    fn set_delay_time(&mut self, ms: f64) -> EngineResult {
        if self.missing_effects.contains(&EffectKind::Delay) {
            return Err(EngineError::EffectUnavailable(EffectKind::Delay));
        }
        self.push(EngineCall::DelayTime(ms))
    }

    fn set_waveform_speed_ratio(&mut self, ratio: f64) -> EngineResult {
        self.push(EngineCall::WaveformSpeed(ratio))
    }

    fn set_effect_param(&mut self, param: EffectParam, value: f32) -> EngineResult {
        if self.missing_effects.contains(&param.kind()) {
            return Err(EngineError::EffectUnavailable(param.kind()));
        }
        self.push(EngineCall::EffectParam { param, value })
    }

    fn set_brake(&mut self, amount: f32) -> EngineResult {
        self.push(EngineCall::Brake(amount))
    }

    fn play(&mut self) -> EngineResult {
        self.playing = true;
        self.push(EngineCall::Play)
    }

    fn stop(&mut self) -> EngineResult {
        self.playing = false;
        self.recording = false;
        self.push(EngineCall::Stop)
    }

    fn arm_track(&mut self, deck: Deck, armed: bool) -> EngineResult {
        self.deck_call(deck, EngineCall::Arm { deck, armed })?;
        if armed {
            self.armed.insert(deck);
        } else {
            self.armed.remove(&deck);
        }
        Ok(())
    }

    fn record(&mut self) -> EngineResult {
        if self.armed.is_empty() {
            return Err(EngineError::Backend("no track armed".to_string()));
        }
        self.playing = true;
        self.recording = true;
        self.push(EngineCall::Record)
    }

    fn rewind(&mut self) -> EngineResult {
        self.push(EngineCall::Rewind)
    }
}
