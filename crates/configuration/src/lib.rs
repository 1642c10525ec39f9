use std::path::Path;

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Display, Geography, Locale};

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "RETURN_MAP";

/// Loads the application configuration from the optional `config.toml` file.
///
/// Built-in defaults are layered under the file, and environment variables
/// such as `RETURN_MAP__DISPLAY__GAP=4` are layered over it.
pub fn load_config() -> Result<Config, ConfigError> {
    build(Path::new(DEFAULT_CONFIG_FILE), false)
}

/// Loads the configuration from an explicit file, which must exist.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    build(path.as_ref(), true)
}

fn build(path: &Path, required: bool) -> Result<Config, ConfigError> {
    let defaults = config::Config::try_from(&Config::default())?;

    let builder = config::Config::builder()
        .add_source(defaults)
        .add_source(config::File::from(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        geographies = config.geographies.len(),
        "Configuration loaded."
    );

    Ok(config)
}
