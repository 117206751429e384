//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/seglist/seglist.toml`
//! 3. Environment variables: `SEGLIST_*` prefix

use std::path::Path;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::error::{ApplicationError, ApplicationResult};

/// Label namespace the embedding UI resolves user-visible text from.
///
/// Resolved once at construction and passed explicitly into every
/// message-surface call, never re-derived per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelNamespace {
    #[default]
    Default,
    Alternate,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Label namespace for message-surface calls
    pub namespace: LabelNamespace,
}

impl Settings {
    /// Load settings from the global config file and environment.
    pub fn load() -> ApplicationResult<Self> {
        let global = ProjectDirs::from("", "", "seglist")
            .map(|dirs| dirs.config_dir().join("seglist.toml"));
        Self::load_from(global.as_deref())
    }

    /// Load settings with an explicit config file location.
    ///
    /// `None` (or a missing file) falls back to compiled defaults plus
    /// environment overrides.
    pub fn load_from(global: Option<&Path>) -> ApplicationResult<Self> {
        let mut builder = Config::builder()
            .set_default("namespace", "default")
            .map_err(config_error)?;

        if let Some(path) = global {
            if path.exists() {
                builder = builder.add_source(File::from(path.to_path_buf()).required(false));
            }
        }
        builder = builder.add_source(Environment::with_prefix("SEGLIST"));

        builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)
    }
}

fn config_error(err: config::ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: err.to_string(),
    }
}
