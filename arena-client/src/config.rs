/// Config file loading and creation for the policy-arena CLI.
///
/// Config lives at ~/.config/policy-arena/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct ArenaConfig {
    pub arena_url: Option<String>,
    pub environment: Option<String>,
    pub num_opponents: Option<usize>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# policy-arena configuration
# All values here can be overridden by CLI flags.

# Arena backend deployment URL
# arena_url = \"https://grandiose-rook-292.convex.cloud\"

# Default environment for opponent recommendations
# environment = \"franka_pick_cube\"

# Default number of opponents per recommendation
# num_opponents = 2
";

/// Returns the default config path: ~/.config/policy-arena/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("policy-arena").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> ArenaConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content)
                .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ArenaConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
