//! Standard config locations

use std::path::PathBuf;

/// Config directory: `~/.config/screw` (platform equivalent elsewhere)
///
/// Falls back to `./screw` when no config or home directory is known.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("screw")
}

/// Path of a config file inside [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_app_name() {
        assert!(default_config_dir().ends_with("screw"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        let path = default_config_path("player.yaml");
        assert!(path.ends_with("screw/player.yaml"));
    }
}
