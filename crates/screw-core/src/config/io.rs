//! Generic YAML configuration I/O
//!
//! A missing or broken config file never stops the player: loading falls back
//! to `T::default()` and says why in the log.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Parse configuration from YAML text
pub fn parse_config<T>(yaml: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_yaml::from_str(yaml).context("Failed to parse config YAML")
}

/// Load configuration from a YAML file
///
/// Returns `T::default()` if the file is missing, unreadable or invalid.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("config: {:?} doesn't exist, using defaults", path);
        return T::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("config: failed to read {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::info!("config: loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("config: {:?}: {:#}, using defaults", path, e);
            T::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("config: saved {:?}", path);
    Ok(())
}
