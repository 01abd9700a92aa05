//! Screw Player - chop & screw from the terminal
//!
//! This is the entry point for the headless player. It:
//! 1. Loads the player and gamepad configs
//! 2. Starts a stdin reader thread (commands and raw gamepad events)
//! 3. Runs the control loop: commands, the 30 Hz tick and chop deadlines
//!
//! ## Command line flags
//!
//! - `--config <path>`: player config (default ~/.config/screw/player.yaml)
//! - `--gamepad <path>`: gamepad config (default ~/.config/screw/gamepad.yaml)

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver, Sender};

use screw_core::TICK_INTERVAL;
use screw_input::{Gamepad, InputHub};
use screw_player::app::{App, Reply};
use screw_player::commands::{Command, HELP};
use screw_player::config::{self, PlayerConfig};
use screw_player::engine::LogEngine;

/// Value following a `--flag` argument
fn flag_value(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

/// Read stdin on a background thread
///
/// Gamepad events go straight to the hub, like a device callback would;
/// everything else is forwarded to the control loop.
fn spawn_stdin_reader(hub: InputHub, command_tx: Sender<Command>) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Input(raw)) => match raw.resolve() {
                        Some(event) => {
                            hub.publish(event);
                        }
                        None => log::debug!("input: ignoring unknown id in {:?}", raw),
                    },
                    Ok(command) => {
                        if command_tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            // EOF ends the session
            let _ = command_tx.send(Command::Quit);
        })
        .context("Failed to spawn stdin reader thread")
}

fn run(mut app: App<LogEngine>, commands: Receiver<Command>) {
    let ticker = channel::tick(TICK_INTERVAL);

    loop {
        let deadline = app
            .next_deadline()
            .map(channel::at)
            .unwrap_or_else(channel::never);

        channel::select! {
            recv(commands) -> command => {
                let Ok(command) = command else { break };
                match app.execute(command, Instant::now()) {
                    Ok(Reply::Continue) => {}
                    Ok(Reply::Print(text)) => println!("{}", text),
                    Ok(Reply::Quit) => break,
                    Err(e) => eprintln!("error: {:#}", e),
                }
            }
            recv(ticker) -> _ => app.tick(Instant::now()),
            recv(deadline) -> _ => app.tick(Instant::now()),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("usage: screw-player [--config <path>] [--gamepad <path>]\n\n{}", HELP);
        return Ok(());
    }

    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("screw-player starting up");

    let config_path = flag_value(&args, "--config").unwrap_or_else(config::default_config_path);
    let player_config: PlayerConfig = config::load_config(&config_path);

    let gamepad_path = flag_value(&args, "--gamepad").or_else(|| player_config.gamepad_config.clone());

    let hub = InputHub::new();
    let gamepad = Gamepad::new(&hub, gamepad_path.as_deref());
    let app = App::new(LogEngine::new(), &player_config, hub.clone(), gamepad);

    let (command_tx, command_rx) = channel::unbounded();
    let _reader = spawn_stdin_reader(hub, command_tx)?;

    println!("screw-player ready, type 'help' for commands");
    run(app, command_rx);

    log::info!("screw-player shutting down");
    Ok(())
}
