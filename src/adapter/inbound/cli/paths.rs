//! Path utilities for wagerline.
//!
//! All data lives under `~/.wagerline/`:
//! - `~/.wagerline/config.toml` - main configuration
//! - `~/.wagerline/keystore.json` - encrypted wallet keystore

use std::path::PathBuf;

/// Returns the wagerline home directory (`~/.wagerline/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wagerline")
}

/// Returns the default config file path (`~/.wagerline/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default keystore path (`~/.wagerline/keystore.json`).
pub fn default_keystore() -> PathBuf {
    home_dir().join("keystore.json")
}
