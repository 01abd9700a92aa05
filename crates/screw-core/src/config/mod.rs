//! Shared configuration utilities
//!
//! YAML config loading/saving shared by the player and the input crate, and
//! the standard config locations.
//!
//! # Usage
//!
//! ```ignore
//! use screw_core::config::{load_config, save_config, default_config_path};
//!
//! let path = default_config_path("player.yaml");
//! let config: PlayerConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, parse_config, save_config};
pub use paths::{default_config_dir, default_config_path};
