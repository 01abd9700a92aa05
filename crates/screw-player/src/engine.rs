//! Logging deck engine
//!
//! Stand-in for the audio backend when running headless: every call is
//! logged and the transport state is tracked so obviously wrong sequences
//! (playing with nothing loaded) still fail the way a real engine would.

use std::path::{Path, PathBuf};
use std::time::Duration;

use screw_core::effect::EffectParam;
use screw_core::engine::{DeckEngine, EngineError, EngineResult};
use screw_core::{Deck, NUM_DECKS};

/// Engine that logs instead of producing audio
#[derive(Debug, Default)]
pub struct LogEngine {
    sources: [Option<PathBuf>; NUM_DECKS],
    playing: bool,
    armed: [bool; NUM_DECKS],
    recording: bool,
}

impl LogEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn loaded(&self) -> bool {
        self.sources.iter().any(Option::is_some)
    }
}

impl DeckEngine for LogEngine {
    fn load_source(&mut self, deck: Deck, source: &Path, length: Duration) -> EngineResult {
        log::info!(
            "engine: deck {} <- {:?} ({:.1}s)",
            deck,
            source,
            length.as_secs_f64()
        );
        self.sources[deck.index()] = Some(source.to_path_buf());
        Ok(())
    }

    fn set_track_volume(&mut self, deck: Deck, db: f32) -> EngineResult {
        if self.sources[deck.index()].is_none() {
            return Err(EngineError::TrackUnavailable(deck));
        }
        log::info!("engine: deck {} volume {:.2} dB", deck, db);
        Ok(())
    }

    fn set_clip_offset(&mut self, deck: Deck, offset_ms: f64) -> EngineResult {
        if self.sources[deck.index()].is_none() {
            return Err(EngineError::TrackUnavailable(deck));
        }
        log::info!("engine: deck {} clip offset {:.1} ms", deck, offset_ms);
        Ok(())
    }

    fn set_tempo(&mut self, bpm: f64) -> EngineResult {
        log::info!("engine: tempo {:.2} BPM", bpm);
        Ok(())
    }

    fn set_delay_time(&mut self, ms: f64) -> EngineResult {
        log::info!("engine: delay time {:.1} ms", ms);
        Ok(())
    }

    fn set_waveform_speed_ratio(&mut self, ratio: f64) -> EngineResult {
        log::debug!("engine: waveform speed {:.3}", ratio);
        Ok(())
    }

    fn set_effect_param(&mut self, param: EffectParam, value: f32) -> EngineResult {
        let unit = param.info().unit;
        log::info!("engine: {} = {:.3}{}", param, value, unit);
        Ok(())
    }

    fn set_brake(&mut self, amount: f32) -> EngineResult {
        log::debug!("engine: brake {:.3}", amount);
        Ok(())
    }

    fn play(&mut self) -> EngineResult {
        if !self.loaded() {
            return Err(EngineError::NoSource);
        }
        self.playing = true;
        log::info!("engine: play");
        Ok(())
    }

    fn stop(&mut self) -> EngineResult {
        self.playing = false;
        self.recording = false;
        log::info!("engine: stop");
        Ok(())
    }

    fn arm_track(&mut self, deck: Deck, armed: bool) -> EngineResult {
        self.armed[deck.index()] = armed;
        log::info!("engine: deck {} {}", deck, if armed { "armed" } else { "disarmed" });
        Ok(())
    }

    fn record(&mut self) -> EngineResult {
        if !self.armed.iter().any(|armed| *armed) {
            return Err(EngineError::Backend("no track armed".to_string()));
        }
        self.playing = true;
        self.recording = true;
        log::info!("engine: record");
        Ok(())
    }

    fn rewind(&mut self) -> EngineResult {
        log::info!("engine: rewind");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_requires_source() {
        let mut engine = LogEngine::new();
        assert_eq!(engine.play(), Err(EngineError::NoSource));
        assert_eq!(
            engine.set_track_volume(Deck::A, 0.0),
            Err(EngineError::TrackUnavailable(Deck::A))
        );

        engine
            .load_source(Deck::A, Path::new("a.wav"), Duration::from_secs(1))
            .unwrap();
        assert!(engine.play().is_ok());
        assert!(engine.is_playing());
        assert!(engine.stop().is_ok());
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_record_requires_armed_track() {
        let mut engine = LogEngine::new();
        assert!(matches!(engine.record(), Err(EngineError::Backend(_))));

        engine.arm_track(Deck::A, true).unwrap();
        engine.record().unwrap();
        assert!(engine.is_recording());
        engine.stop().unwrap();
        assert!(!engine.is_recording());
    }
}
