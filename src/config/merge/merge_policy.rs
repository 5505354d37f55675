//! Built-in defaults, the lowest-precedence configuration source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Config builder seeded with the built-in defaults
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("overrides.root", "overrides")?
        .set_default("cache.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
