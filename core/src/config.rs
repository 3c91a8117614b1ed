//! JSON config persistence.
//!
//! The config lives as `config.json` under the platform config directory
//! and keeps the original camelCase field names, so files written by
//! earlier versions of the tool load unchanged. Loading a missing file
//! writes out defaults first; a corrupt file surfaces a parse error so the
//! caller can fall back to defaults and keep running.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use autoloot_types::LootConfig;

/// Errors that can occur during config loading or saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error accessing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Default config file location under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("autoloot").join("config.json"))
}

/// Load a config file.
pub fn load_file(path: &Path) -> Result<LootConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a config, creating parent directories as needed.
pub fn save_file(path: &Path, config: &LootConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let contents = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the config, generating a default file when none exists yet.
pub fn load_or_create(path: &Path) -> Result<LootConfig, ConfigError> {
    if !path.exists() {
        let config = LootConfig::default();
        save_file(path, &config)?;
        tracing::info!(?path, "generated default config");
        return Ok(config);
    }
    load_file(path)
}
