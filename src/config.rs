//! Configuration
//!
//! Process configuration for the engine and the `strata` binary. Sources are
//! layered with the `config` crate, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. global file (`$XDG_CONFIG_HOME/strata/config.toml`)
//! 3. workspace file (`<workspace>/strata.toml`)
//! 4. `STRATA__*` environment variables (`STRATA__CACHE__ENABLED=false`)

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use config::Environment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod global_file;
    pub mod workspace_file;
}

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_CONFIG_FILE};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub overrides: OverridesConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where override documents are read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Root of the override directory; relative paths are taken from the workspace
    #[serde(default = "default_overrides_root")]
    pub root: PathBuf,
}

fn default_overrides_root() -> PathBuf {
    PathBuf::from("overrides")
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            root: default_overrides_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
        }
    }
}

impl StrataConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overrides.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "overrides.root cannot be empty".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Override root resolved against the workspace
    pub fn overrides_root(&self, workspace_root: &Path) -> PathBuf {
        if self.overrides.root.is_absolute() {
            self.overrides.root.clone()
        } else {
            workspace_root.join(&self.overrides.root)
        }
    }
}

/// Loads [`StrataConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load for a workspace, discovering the global and workspace files
    pub fn load(workspace_root: &Path) -> Result<StrataConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config = Self::finish(builder)?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load from one explicit file on top of the defaults, skipping discovery
    pub fn load_from_file(path: &Path) -> Result<StrataConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<StrataConfig, ConfigError> {
        let config: StrataConfig = builder
            .add_source(
                Environment::with_prefix("STRATA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
