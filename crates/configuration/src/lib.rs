use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, Settings};

/// Loads the pipeline configuration.
///
/// Reads `config.toml` when present and then lets `FINDATA_*` environment
/// variables override individual keys (e.g. `FINDATA_DATABASE__HOST`), which
/// is how deployed workers receive their store endpoint.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("FINDATA").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct.
    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}
