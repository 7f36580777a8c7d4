//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/trellis/trellis.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `TRELLIS_*` prefix, `__` between sections
//!    (e.g. `TRELLIS_NOTATION__SEPARATOR=", "`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{DomainError, Notation};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{0}")]
    Invalid(#[from] DomainError),

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Unified configuration for trellis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Labels and punctuation used to render and parse trees
    pub notation: Notation,
}

/// Get the XDG config directory for trellis.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "trellis").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("trellis.toml"))
}

impl Settings {
    /// Load settings with full layered precedence.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_layers(global_config_path().as_deref(), explicit, true)
    }

    /// Load settings from the given layers.
    #[instrument(level = "debug")]
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        with_env: bool,
    ) -> Result<Self, SettingsError> {
        let defaults = Notation::default();
        let mut builder = Config::builder()
            .set_default("notation.leaf", defaults.leaf)?
            .set_default("notation.branch", defaults.branch)?
            .set_default("notation.open", defaults.open)?
            .set_default("notation.close", defaults.close)?
            .set_default("notation.separator", defaults.separator)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            builder = builder.add_source(File::from(path).required(true));
        }

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("TRELLIS")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.notation.validate()?;
        Ok(settings)
    }

    /// Render the merged settings as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_layers() {
        let settings = Settings::load_layers(None, None, false).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_to_toml_contains_notation() {
        let rendered = Settings::default().to_toml().unwrap();
        assert!(rendered.contains("[notation]"));
        assert!(rendered.contains("branch = \"Branch\""));
    }

    #[test]
    fn test_global_config_path_file_name() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("trellis.toml"));
        }
    }
}
