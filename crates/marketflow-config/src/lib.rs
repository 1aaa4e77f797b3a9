//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DispatchSettings, LoggingConfig, MarketSettings, SecurityEntry,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment overrides use the `MARKETFLOW__` prefix with `__` as the
/// section separator, e.g. `MARKETFLOW__DISPATCH__MAX_WORKERS=8`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("MARKETFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
