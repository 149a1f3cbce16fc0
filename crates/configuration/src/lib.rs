use crate::error::ConfigError;
use crate::settings::Settings;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

pub const DEFAULT_PORT: u16 = 8080;

/// Loads the service configuration from the process environment.
///
/// A `.env` file in the working directory is read first if present; real
/// environment variables always win over it. Fails when `DB_CONN` is
/// missing or empty, or when `PORT` is not a valid port number.
pub fn load_config() -> Result<Settings, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env file."),
        Err(_) => tracing::info!("No .env file found, using environment variables."),
    }

    load_from(config::Environment::default())
}

/// Builds `Settings` from an explicit environment source.
pub fn load_from(env: config::Environment) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("run_migrations", true)?
        // An empty PORT falls back to the default instead of failing to parse.
        .add_source(env.ignore_empty(true).try_parsing(true))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;

    if settings.db_conn.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "DB_CONN is required but not set".to_string(),
        ));
    }

    Ok(settings)
}
