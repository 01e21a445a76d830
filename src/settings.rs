//! Runtime configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional `trivia.toml`
//! in the working directory, then `TRIVIA_*` environment variables (a `.env`
//! file is loaded into the environment first).

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    /// Requests under this prefix get `Access-Control-Allow-Origin: *`.
    pub cors_prefix: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("trivia").required(false))
                .add_source(Environment::with_prefix("TRIVIA").try_parsing(true)),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("cors_prefix", "/api/")?
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
