//! # Application Configuration
//!
//! Loaded once at process start from environment variables (with `.env`
//! support via `dotenvy` in the entry point) into an explicit [`Config`]
//! struct that is passed down through [`crate::state::build_app_state`].
//! There is no module-level store client: everything that talks to the
//! store receives it through the application state.

use buyback_postgrest::StoreConfig;
use std::env;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable was not set.
    Missing(&'static str),
    /// A variable was present but could not be parsed.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => {
                write!(f, "Missing required environment variable: {name}")
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The port for the server to listen on. Loaded from `PORT`.
    pub port: u16,
    /// Connection settings for the hosted store. Loaded from
    /// `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`.
    pub store: StoreConfig,
}

fn default_port() -> u16 {
    8080
}

/// Loads the configuration from the environment.
pub fn get_config() -> Result<Config, ConfigError> {
    let url = env::var("SUPABASE_URL").map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
    let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
        .map_err(|_| ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;

    let port = match env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port number: {raw}")))?,
        Err(_) => default_port(),
    };

    Ok(Config {
        port,
        store: StoreConfig {
            url,
            service_role_key,
        },
    })
}
