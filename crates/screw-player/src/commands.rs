//! Terminal commands
//!
//! One command per line on stdin. Gamepad events use the raw form
//! (`down 0`, `axis 5 0.8`) and go through the input hub like a real pad;
//! everything else drives the session directly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use screw_core::library::SortColumn;
use screw_input::{ParseEventError, RawInputEvent};

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a track to the library and load it
    Load {
        path: PathBuf,
        length: Duration,
        bpm: Option<f64>,
    },
    /// Move the crossfader (0.0 = deck A, 1.0 = deck B)
    Fader(f32),
    /// On-screen chop button down
    Chop,
    /// On-screen chop button up
    Release,
    /// Live tempo in BPM
    Tempo(f64),
    /// Live tempo as a fraction of the base tempo
    Percent(f64),
    /// Configured screw preset by index
    Preset(usize),
    /// Raw gamepad event
    Input(RawInputEvent),
    Play,
    Stop,
    Toggle,
    /// Start or stop recording
    Record,
    /// Edit a library row's BPM
    SetBpm { row: usize, bpm: f64 },
    /// Sort the library
    Sort { column: SortColumn, ascending: bool },
    /// Print the library
    Library,
    /// Print session state
    Status,
    Help,
    Quit,
}

/// Error parsing a command line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {what}")]
    Missing {
        command: &'static str,
        what: &'static str,
    },

    #[error("Invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },

    #[error(transparent)]
    Input(#[from] ParseEventError),
}

pub const HELP: &str = "\
commands:
  load <path> <seconds> [bpm]   load a track into both decks
  fader <0..1>                  move the crossfader
  chop | release                chop button down / up
  tempo <bpm>                   set the live tempo
  percent <ratio>               live tempo as a fraction of the base tempo
  preset <n>                    apply a screw preset
  down <id> | up <id>           gamepad button (SDL ids)
  axis <id> <value>             gamepad axis (normalized)
  play | stop | toggle          transport
  record                        start / stop recording
  library | bpm <row> <bpm>     show the library / edit a BPM
  sort name|bpm [asc|desc]      sort the library
  status | help | quit";

fn arg<T: FromStr>(
    command: &'static str,
    what: &'static str,
    value: Option<&str>,
) -> Result<T, CommandError> {
    let value = value.ok_or(CommandError::Missing { command, what })?;
    value.parse().map_err(|_| CommandError::Invalid {
        what,
        value: value.to_string(),
    })
}

fn seconds(value: f64) -> Result<Duration, CommandError> {
    Duration::try_from_secs_f64(value).map_err(|_| CommandError::Invalid {
        what: "length",
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandError::Empty)?;

        let command = match name {
            "load" => {
                let path: PathBuf = arg("load", "a path", parts.next())?;
                let length = seconds(arg("load", "a length in seconds", parts.next())?)?;
                let bpm = parts.next().map(|v| arg("load", "a BPM", Some(v))).transpose()?;
                Command::Load { path, length, bpm }
            }
            "fader" => Command::Fader(arg("fader", "a position", parts.next())?),
            "chop" => Command::Chop,
            "release" => Command::Release,
            "tempo" => Command::Tempo(arg("tempo", "a BPM", parts.next())?),
            "percent" => Command::Percent(arg("percent", "a ratio", parts.next())?),
            "preset" => Command::Preset(arg("preset", "an index", parts.next())?),
            "down" | "up" | "axis" => Command::Input(line.parse()?),
            "play" => Command::Play,
            "stop" => Command::Stop,
            "toggle" => Command::Toggle,
            "record" | "rec" => Command::Record,
            "bpm" => Command::SetBpm {
                row: arg("bpm", "a row", parts.next())?,
                bpm: arg("bpm", "a BPM", parts.next())?,
            },
            "sort" => {
                let column = match parts.next() {
                    Some("name") => SortColumn::Name,
                    Some("bpm") => SortColumn::Bpm,
                    Some(other) => {
                        return Err(CommandError::Invalid {
                            what: "sort column",
                            value: other.to_string(),
                        })
                    }
                    None => {
                        return Err(CommandError::Missing {
                            command: "sort",
                            what: "a column",
                        })
                    }
                };
                let ascending = !matches!(parts.next(), Some("desc"));
                Command::Sort { column, ascending }
            }
            "library" | "ls" => Command::Library,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_load() {
        assert_eq!(
            parse("load /music/a.wav 180 72.5"),
            Ok(Command::Load {
                path: PathBuf::from("/music/a.wav"),
                length: Duration::from_secs(180),
                bpm: Some(72.5),
            })
        );
        assert_eq!(
            parse("load a.wav 2.5"),
            Ok(Command::Load {
                path: PathBuf::from("a.wav"),
                length: Duration::from_millis(2500),
                bpm: None,
            })
        );
        assert_eq!(
            parse("load a.wav"),
            Err(CommandError::Missing { command: "load", what: "a length in seconds" })
        );
        assert!(matches!(parse("load a.wav -3"), Err(CommandError::Invalid { what: "length", .. })));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("  fader 0.25 "), Ok(Command::Fader(0.25)));
        assert_eq!(parse("chop"), Ok(Command::Chop));
        assert_eq!(parse("percent 0.8"), Ok(Command::Percent(0.8)));
        assert_eq!(parse("preset 2"), Ok(Command::Preset(2)));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse("rec"), Ok(Command::Record));
        assert_eq!(parse("bpm 1 99"), Ok(Command::SetBpm { row: 1, bpm: 99.0 }));
    }

    #[test]
    fn test_gamepad_events() {
        assert_eq!(parse("down 11"), Ok(Command::Input(RawInputEvent::ButtonDown(11))));
        assert_eq!(parse("axis 0 -0.5"), Ok(Command::Input(RawInputEvent::Axis(0, -0.5))));
        assert!(matches!(parse("axis 0"), Err(CommandError::Input(_))));
    }

    #[test]
    fn test_sort() {
        assert_eq!(
            parse("sort bpm desc"),
            Ok(Command::Sort { column: SortColumn::Bpm, ascending: false })
        );
        assert_eq!(
            parse("sort name"),
            Ok(Command::Sort { column: SortColumn::Name, ascending: true })
        );
        assert!(parse("sort key").is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(CommandError::Empty));
        assert_eq!(parse("scratch"), Err(CommandError::Unknown("scratch".to_string())));
        assert!(matches!(parse("tempo fast"), Err(CommandError::Invalid { what: "a BPM", .. })));
    }
}
