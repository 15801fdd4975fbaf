//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `INFRAGEN_*` environment variables (`INFRAGEN_VALIDATOR__COMMAND=...`)
//! 3. Explicit `--config-file`
//! 4. `infragen.toml` in the current directory
//! 5. User config file (`config.toml` in the platform config dir)
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use infragen_adapters::DEFAULT_VALIDATOR_COMMAND;

pub const LOCAL_CONFIG_FILE: &str = "infragen.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub paths: PathsConfig,
    pub validator: ValidatorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Package used when `generate env` gets no `--config`.
    pub config_package: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            config_package: "core".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub repo_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub command: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_VALIDATOR_COMMAND.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from every layer.
    ///
    /// `config_file` is the path passed via `--config-file`; unlike the
    /// implicit layers it must exist.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_layers(
            Some(Self::config_path()),
            Path::new(LOCAL_CONFIG_FILE),
            config_file,
        )
    }

    pub(crate) fn load_layers(
        user_file: Option<PathBuf>,
        local_file: &Path,
        explicit: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = user_file.filter(|p| p.exists()) {
            builder = builder.add_source(File::from(path));
        }
        if local_file.exists() {
            builder = builder.add_source(File::from(local_file.to_path_buf()));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("INFRAGEN")
                .prefix_separator("_")
                .separator("__"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `infragen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "infragen", "infragen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Render as TOML, as written by `init` and shown by `config list`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
