//! Player application state
//!
//! Ties the session to the track library and the gamepad. The binary feeds
//! it commands and ticks; everything runs on the caller's thread.

use std::fmt::Write as _;
use std::time::Instant;

use anyhow::{Context, Result};
use screw_core::chop::ChopSource;
use screw_core::engine::DeckEngine;
use screw_core::library::TrackLibrary;
use screw_input::{Gamepad, InputHub, TimedMessage};

use crate::commands::{Command, HELP};
use crate::config::PlayerConfig;
use crate::session::Session;

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Continue,
    /// Text for the user
    Print(String),
    Quit,
}

/// The running player
pub struct App<E: DeckEngine> {
    session: Session<E>,
    library: TrackLibrary,
    hub: InputHub,
    gamepad: Gamepad,
}

impl<E: DeckEngine> App<E> {
    /// Create the app; the gamepad subscribes to `hub`
    pub fn new(engine: E, config: &PlayerConfig, hub: InputHub, gamepad: Gamepad) -> Self {
        Self {
            session: Session::new(engine, config),
            library: TrackLibrary::new(),
            hub,
            gamepad,
        }
    }

    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    pub fn library(&self) -> &TrackLibrary {
        &self.library
    }

    /// When the main loop must wake up for a deferred chop
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    /// Periodic update: route pending gamepad input, then advance the session
    ///
    /// Gamepad messages are applied at the time their event was published,
    /// not at `now`.
    pub fn tick(&mut self, now: Instant) {
        for TimedMessage { message, at } in self.gamepad.poll() {
            self.session.handle(message, at);
        }
        self.session.tick(now);
    }

    /// Run one command
    pub fn execute(&mut self, command: Command, now: Instant) -> Result<Reply> {
        match command {
            Command::Load { path, length, bpm } => {
                let base_bpm = self.library.resolve_bpm(&path, bpm);
                self.session
                    .load_track(&path, length, base_bpm)
                    .with_context(|| format!("Failed to load {:?}", path))?;
                let row = self.library.add(path, bpm);
                return Ok(Reply::Print(format!(
                    "loaded '{}' at {:.2} BPM",
                    self.library.entries()[row].name,
                    base_bpm
                )));
            }
            Command::Fader(position) => self.session.set_crossfader(position),
            Command::Chop => {
                self.session.chop_press(ChopSource::Ui, now);
            }
            Command::Release => {
                self.session.chop_release(ChopSource::Ui, now);
            }
            Command::Tempo(bpm) => self.session.set_live_tempo(bpm)?,
            Command::Percent(percentage) => self.session.set_tempo_percentage(percentage)?,
            Command::Preset(index) => self.session.apply_preset(index)?,
            Command::Input(raw) => match raw.resolve() {
                Some(event) => {
                    self.hub.publish_at(event, now);
                }
                None => log::debug!("input: ignoring unknown id in {:?}", raw),
            },
            Command::Play => self.session.play(),
            Command::Stop => self.session.stop(),
            Command::Toggle => self.session.toggle_play(),
            Command::Record => {
                self.session.toggle_record();
                let state = if self.session.is_recording() { "recording" } else { "not recording" };
                return Ok(Reply::Print(state.to_string()));
            }
            Command::SetBpm { row, bpm } => {
                self.library.set_bpm(row, bpm)?;
            }
            Command::Sort { column, ascending } => self.library.sort(column, ascending),
            Command::Library => return Ok(Reply::Print(self.library_text())),
            Command::Status => return Ok(Reply::Print(self.status_text())),
            Command::Help => return Ok(Reply::Print(HELP.to_string())),
            Command::Quit => return Ok(Reply::Quit),
        }
        Ok(Reply::Continue)
    }

    fn library_text(&self) -> String {
        if self.library.is_empty() {
            return "library is empty".to_string();
        }
        let mut text = String::new();
        for (row, entry) in self.library.entries().iter().enumerate() {
            let _ = writeln!(text, "{:>3}  {:>7.2}  {}", row, entry.bpm, entry.name);
        }
        text.trim_end().to_string()
    }

    fn status_text(&self) -> String {
        let session = &self.session;
        let tempo = session.tempo();
        let track = session
            .deck()
            .map(|d| d.source().display().to_string())
            .unwrap_or_else(|| "-".to_string());

        let presets: Vec<String> = session
            .presets()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if session.active_preset() == Some(i) { "*" } else { "" };
                format!("{}{:.0}%", marker, p * 100.0)
            })
            .collect();

        format!(
            "track: {}\n\
             playing: {}  recording: {}  crossfader: {:.2}  chop: {:?}\n\
             tempo: {:.2} / {:.2} BPM (ratio {:.3})  presets: {}\n\
             brake: {:.2}",
            track,
            session.is_playing(),
            session.is_recording(),
            session.crossfader(),
            session.chop_state(),
            tempo.live(),
            tempo.base(),
            tempo.ratio(),
            presets.join(" "),
            session.brake_amount(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screw_core::engine::RecordingEngine;
    use screw_core::Deck;
    use screw_input::{GamepadConfig, RawInputEvent};
    use std::time::Duration;

    fn app() -> App<RecordingEngine> {
        let hub = InputHub::new();
        let gamepad = Gamepad::with_config(&hub, GamepadConfig::default());
        App::new(RecordingEngine::new(), &PlayerConfig::default(), hub, gamepad)
    }

    fn run(app: &mut App<RecordingEngine>, line: &str, now: Instant) -> Reply {
        app.execute(line.parse().unwrap(), now).unwrap()
    }

    #[test]
    fn test_load_uses_library_bpm() {
        let mut app = app();
        let now = Instant::now();

        let reply = run(&mut app, "load /music/slow.wav 120", now);
        assert_eq!(reply, Reply::Print("loaded 'slow' at 120.00 BPM".to_string()));

        run(&mut app, "load /music/slow.wav 120 70", now);
        assert_eq!(app.session().tempo().base(), 70.0);
        assert_eq!(app.library().len(), 1);
    }

    #[test]
    fn test_gamepad_chop_through_hub() {
        let mut app = app();
        let t0 = Instant::now();
        run(&mut app, "load a.wav 60 120", t0);

        run(&mut app, "down 0", t0);
        assert_eq!(app.session().crossfader(), 0.0);
        app.tick(t0);
        assert_eq!(app.session().crossfader(), 1.0);

        run(&mut app, "up 0", t0 + Duration::from_millis(100));
        app.tick(t0 + Duration::from_millis(100));
        assert_eq!(app.next_deadline(), Some(t0 + Duration::from_millis(500)));

        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.session().crossfader(), 0.0);
        assert_eq!(app.session().engine().last_volume(Deck::A), Some(0.0));
    }

    #[test]
    fn test_gamepad_hold_measured_from_event_time() {
        let mut app = app();
        let t0 = Instant::now();
        run(&mut app, "load a.wav 60 120", t0);

        // Press and release both land between two ticks
        run(&mut app, "down 0", t0 + Duration::from_millis(5));
        run(&mut app, "up 0", t0 + Duration::from_millis(30));
        app.tick(t0 + Duration::from_millis(33));

        assert_eq!(app.session().crossfader(), 1.0);
        assert_eq!(app.next_deadline(), Some(t0 + Duration::from_millis(505)));
    }

    #[test]
    fn test_failed_load_leaves_library_untouched() {
        let mut app = app();
        let err = app
            .execute(
                Command::Load { path: "a.wav".into(), length: Duration::ZERO, bpm: Some(90.0) },
                Instant::now(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("a.wav"));
        assert!(app.library().is_empty());
        assert!(app.session().deck().is_none());
    }

    #[test]
    fn test_record_command() {
        let mut app = app();
        let now = Instant::now();
        run(&mut app, "load a.wav 60 100", now);

        assert_eq!(run(&mut app, "record", now), Reply::Print("recording".to_string()));
        assert!(app.session().engine().is_recording());
        let Reply::Print(status) = run(&mut app, "status", now) else {
            panic!("status should print");
        };
        assert!(status.contains("recording: true"));

        assert_eq!(run(&mut app, "record", now), Reply::Print("not recording".to_string()));
        assert!(!app.session().is_recording());
    }

    #[test]
    fn test_unknown_input_ignored() {
        let mut app = app();
        let reply = app
            .execute(Command::Input(RawInputEvent::ButtonDown(77)), Instant::now())
            .unwrap();
        assert_eq!(reply, Reply::Continue);
    }

    #[test]
    fn test_rejected_tempo_is_error() {
        let mut app = app();
        let err = app.execute(Command::Tempo(0.0), Instant::now()).unwrap_err();
        assert!(err.to_string().contains("Tempo rejected"));
    }

    #[test]
    fn test_status_marks_active_preset() {
        let mut app = app();
        let now = Instant::now();
        run(&mut app, "load a.wav 60 100", now);
        run(&mut app, "preset 1", now);

        let Reply::Print(status) = run(&mut app, "status", now) else {
            panic!("status should print");
        };
        assert!(status.contains("*90%"));
        assert!(status.contains("a.wav"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert_eq!(run(&mut app, "quit", Instant::now()), Reply::Quit);
    }
}
