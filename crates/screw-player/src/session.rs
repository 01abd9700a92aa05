//! Session - the control coordinator
//!
//! Owns every piece of control state and the engine, and is driven from one
//! thread: discrete calls for user actions, [`Session::tick`] at 30 Hz for
//! ramps, the brake spring and expired chop timers.
//!
//! ```text
//! gamepad/keyboard → handle()/chop_*()/set_*() ─┐
//!                                                ├→ Session → DeckEngine
//! main loop ────────────────→ tick(now) ────────┘
//! ```
//!
//! Engine calls are fire-and-forget: failures are logged and ignored, the
//! control state stays authoritative.

use std::path::Path;
use std::time::{Duration, Instant};

use screw_core::brake::VinylBrake;
use screw_core::chop::{
    chop_duration, hold_from_ms, ChopSource, ChopState, ChopTimer, PressOutcome, ReleaseOutcome,
};
use screw_core::crossfade::Crossfader;
use screw_core::deck::{DeckError, DeckPair};
use screw_core::effect::{EffectKind, EffectParam, EffectRack};
use screw_core::engine::{apply, DeckEngine};
use screw_core::tempo::{TempoError, TempoSync, TempoUpdate};
use screw_core::timer::{Scheduler, TimerId, TimerQueue};
use screw_core::{beat_ms, Deck};
use screw_input::ControlMessage;

use crate::config::PlayerConfig;

/// Errors from session operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to load track: {0}")]
    Deck(#[from] DeckError),

    #[error("Tempo rejected: {0}")]
    Tempo(#[from] TempoError),

    #[error("No tempo preset at index {0}")]
    NoSuchPreset(usize),
}

/// Control state for one performance
pub struct Session<E: DeckEngine> {
    engine: E,
    crossfader: Crossfader,
    chop: ChopTimer,
    tempo: TempoSync,
    deck: Option<DeckPair>,
    effects: EffectRack,
    brake: VinylBrake,
    timers: TimerQueue,
    presets: Vec<f64>,
    auto_play: bool,
    playing: bool,
    recording: bool,
    last_tick: Option<Instant>,
}

impl<E: DeckEngine> Session<E> {
    /// Create a session around an engine
    pub fn new(engine: E, config: &PlayerConfig) -> Self {
        Self {
            engine,
            crossfader: Crossfader::new(),
            chop: ChopTimer::new(),
            tempo: TempoSync::new(config.tempo.default_bpm),
            deck: None,
            effects: EffectRack::new(config.effects.mix_ramp()),
            brake: VinylBrake::new(config.brake.spring()),
            timers: TimerQueue::new(),
            presets: config.tempo.presets.clone(),
            auto_play: config.auto_play,
            playing: false,
            recording: false,
            last_tick: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn crossfader(&self) -> f32 {
        self.crossfader.position()
    }

    pub fn tempo(&self) -> &TempoSync {
        &self.tempo
    }

    pub fn deck(&self) -> Option<&DeckPair> {
        self.deck.as_ref()
    }

    pub fn chop_state(&self) -> ChopState {
        self.chop.state()
    }

    pub fn brake_amount(&self) -> f32 {
        self.brake.amount()
    }

    pub fn effect_mix(&self, kind: EffectKind) -> f32 {
        self.effects.mix(kind)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn presets(&self) -> &[f64] {
        &self.presets
    }

    /// Earliest pending chop deadline, for the host loop's sleep
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Track loading
    // ─────────────────────────────────────────────────────────────────────

    /// Load a source into both decks
    ///
    /// Deck B trails deck A by one beat at `base_bpm`. The live/base ratio
    /// of the previous track carries over. The crossfader returns to deck A
    /// and playback restarts from the top.
    pub fn load_track(
        &mut self,
        source: &Path,
        length: Duration,
        base_bpm: f64,
    ) -> Result<(), SessionError> {
        let pair = DeckPair::load(source, length, base_bpm)?;
        let update = self.tempo.set_base_tempo(base_bpm)?;

        self.cancel_pending_chop();

        for deck in Deck::ALL {
            apply("load source", self.engine.load_source(deck, source, length));
            apply(
                "clip offset",
                self.engine.set_clip_offset(deck, pair.clip_offset_ms(deck)),
            );
        }
        self.deck = Some(pair);
        self.push_tempo(update);

        self.stop();
        apply("rewind", self.engine.rewind());

        self.set_crossfader(0.0);

        if self.auto_play {
            self.play();
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Crossfader and chop
    // ─────────────────────────────────────────────────────────────────────

    /// Move the crossfader and push the resulting deck gains
    pub fn set_crossfader(&mut self, position: f32) {
        self.crossfader.set(position);
        self.apply_gains();
    }

    /// Minimum hold for a chop from `source`, evaluated now
    pub fn minimum_hold(&self, source: ChopSource) -> Duration {
        match source {
            ChopSource::Ui => chop_duration(self.tempo.live()),
            ChopSource::Controller => {
                let offset = self
                    .deck
                    .as_ref()
                    .map(DeckPair::offset_ms)
                    .unwrap_or_else(|| beat_ms(self.tempo.base()));
                hold_from_ms(offset)
            }
        }
    }

    /// Chop button down
    pub fn chop_press(&mut self, source: ChopSource, now: Instant) -> PressOutcome {
        let outcome = self.chop.press(now, &mut self.crossfader, &mut self.timers);
        log::debug!("chop: {:?} press -> {:?}", source, outcome);
        if outcome == PressOutcome::Toggled {
            self.apply_gains();
        }
        outcome
    }

    /// Chop button up
    pub fn chop_release(&mut self, source: ChopSource, now: Instant) -> ReleaseOutcome {
        let hold = self.minimum_hold(source);
        let outcome = self
            .chop
            .release(now, hold, &mut self.crossfader, &mut self.timers);
        if outcome == ReleaseOutcome::Toggled {
            self.apply_gains();
        }
        outcome
    }

    /// Deliver a fired one-shot; stale ids are ignored
    pub fn fire_timer(&mut self, id: TimerId) -> bool {
        let fired = self.chop.fire(id, &mut self.crossfader);
        if fired {
            self.apply_gains();
        } else {
            log::trace!("chop: stale timer #{} ignored", id.raw());
        }
        fired
    }

    fn cancel_pending_chop(&mut self) {
        if let Some(timer) = self.chop.pending_timer() {
            self.timers.cancel(timer);
        }
        self.chop = ChopTimer::new();
    }

    fn apply_gains(&mut self) {
        let (a, b) = self.crossfader.gains();
        apply("deck A volume", self.engine.set_track_volume(Deck::A, a));
        apply("deck B volume", self.engine.set_track_volume(Deck::B, b));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tempo
    // ─────────────────────────────────────────────────────────────────────

    /// Set the live tempo in BPM
    pub fn set_live_tempo(&mut self, bpm: f64) -> Result<(), SessionError> {
        let update = self.tempo.set_live_tempo(bpm)?;
        self.push_tempo(update);
        Ok(())
    }

    /// Set the live tempo as a fraction of the base tempo
    pub fn set_tempo_percentage(&mut self, percentage: f64) -> Result<(), SessionError> {
        let update = self.tempo.set_percentage(percentage)?;
        self.push_tempo(update);
        Ok(())
    }

    /// Apply a configured screw preset
    pub fn apply_preset(&mut self, index: usize) -> Result<(), SessionError> {
        let percentage = self
            .presets
            .get(index)
            .copied()
            .ok_or(SessionError::NoSuchPreset(index))?;
        self.set_tempo_percentage(percentage)
    }

    /// Index of the preset matching the current tempo, if any
    pub fn active_preset(&self) -> Option<usize> {
        self.presets
            .iter()
            .position(|p| self.tempo.is_percentage_active(*p))
    }

    fn push_tempo(&mut self, update: TempoUpdate) {
        let delay_ms = f64::from(EffectParam::DelayTime.clamp(update.delay_ms as f32));
        log::info!(
            "tempo: {:.2} BPM (ratio {:.3}, delay {:.1} ms)",
            update.live_bpm,
            update.ratio,
            delay_ms
        );
        apply("tempo", self.engine.set_tempo(update.live_bpm));
        apply("delay time", self.engine.set_delay_time(delay_ms));
        apply(
            "waveform speed",
            self.engine.set_waveform_speed_ratio(update.ratio),
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────

    pub fn play(&mut self) {
        if apply("play", self.engine.play()) {
            self.playing = true;
        }
    }

    /// Stop the transport; this also ends a recording pass
    pub fn stop(&mut self) {
        apply("stop", self.engine.stop());
        self.playing = false;
        if self.recording {
            apply("disarm", self.engine.arm_track(Deck::A, false));
            self.recording = false;
            log::info!("record: stopped");
        }
    }

    /// Arm deck A and start the transport recording
    pub fn start_recording(&mut self) {
        if self.recording {
            return;
        }
        apply("arm", self.engine.arm_track(Deck::A, true));
        if apply("record", self.engine.record()) {
            self.recording = true;
            self.playing = true;
            log::info!("record: started on deck {}", Deck::A);
        } else {
            apply("disarm", self.engine.arm_track(Deck::A, false));
        }
    }

    /// Start or stop recording
    pub fn toggle_record(&mut self) {
        if self.recording {
            self.stop();
        } else {
            self.start_recording();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Controller messages and tick
    // ─────────────────────────────────────────────────────────────────────

    /// Apply one control message from the input layer
    pub fn handle(&mut self, message: ControlMessage, now: Instant) {
        log::trace!("input: {:?}", message);
        match message {
            ControlMessage::ChopPress => {
                self.chop_press(ChopSource::Controller, now);
            }
            ControlMessage::ChopRelease => {
                self.chop_release(ChopSource::Controller, now);
            }
            ControlMessage::EffectHold { kind, engaged } => {
                if let Some((param, level)) = self.effects.engage(kind, engaged) {
                    self.push_effect(param, level);
                }
            }
            ControlMessage::Effect { param, value } => {
                self.push_effect(param, param.clamp(value));
            }
            ControlMessage::Brake(amount) => {
                let amount = self.brake.set_amount(amount);
                apply("brake", self.engine.set_brake(amount));
            }
            ControlMessage::BrakeSpring => {
                self.brake.start_spring();
                if !self.brake.is_springing() {
                    // Zero spring time snaps straight back
                    apply("brake", self.engine.set_brake(self.brake.amount()));
                }
            }
        }
    }

    /// Periodic update: expired chop timers, mix ramps, brake spring
    pub fn tick(&mut self, now: Instant) {
        for id in self.timers.take_expired(now) {
            self.fire_timer(id);
        }

        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);

        for (param, level) in self.effects.tick(dt) {
            self.push_effect(param, level);
        }
        if let Some(amount) = self.brake.tick(dt) {
            apply("brake", self.engine.set_brake(amount));
        }
    }

    fn push_effect(&mut self, param: EffectParam, value: f32) {
        apply(
            &param.to_string(),
            self.engine.set_effect_param(param, value),
        );
    }
}
