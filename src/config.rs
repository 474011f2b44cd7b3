//! Store configuration
//!
//! Loads [`StoreConfig`] from a JSON file with graceful fallback: a missing
//! or unreadable file yields the defaults rather than an error, so a fresh
//! checkout works with no setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration for the file-backed game store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one JSON document per game
    pub root_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root_dir: PathBuf::from("games"),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file, falling back to defaults
    ///
    /// Load failures are logged, never fatal.
    pub fn load(path: &Path) -> StoreConfig {
        if !path.exists() {
            info!("[SETTINGS] No config file at {:?}; using defaults", path);
            return StoreConfig::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    info!("[SETTINGS] Loaded store config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "[SETTINGS] Failed to parse config at {:?}: {}. Using defaults.",
                        path, e
                    );
                    StoreConfig::default()
                }
            },
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to read config at {:?}: {}. Using defaults.",
                    path, e
                );
                StoreConfig::default()
            }
        }
    }
}
