//! API server configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! 1. Built-in defaults (below)
//! 2. `ribbon-api.toml` in the working directory, if present
//! 3. `RIBBON_*` environment variables
//!
//! | Key                 | Env                        | Default              |
//! |---------------------|----------------------------|----------------------|
//! | `host`              | `RIBBON_HOST`              | `0.0.0.0`            |
//! | `port`              | `RIBBON_PORT`              | `3000`               |
//! | `database_path`     | `RIBBON_DATABASE_PATH`     | `./ribbon.db`        |
//! | `jwt_secret`        | `RIBBON_JWT_SECRET`        | development secret   |
//! | `jwt_lifetime_secs` | `RIBBON_JWT_LIFETIME_SECS` | `86400` (24 h)       |
//! | `cors_origin`       | `RIBBON_CORS_ORIGIN`       | any origin           |

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Used when `RIBBON_JWT_SECRET` is unset. Never deploy with it.
pub const DEV_JWT_SECRET: &str = "ribbon-dev-secret-change-in-production";

const MIN_JWT_SECRET_LENGTH: usize = 16;

/// One year.
const MAX_JWT_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file, or `:memory:`.
    pub database_path: String,
    /// HS256 signing secret shared by every token route.
    pub jwt_secret: SecretString,
    pub jwt_lifetime_secs: i64,
    /// Allowed browser origin. `None` allows any.
    pub cors_origin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    host: String,
    port: u16,
    database_path: String,
    jwt_secret: String,
    jwt_lifetime_secs: i64,
    #[serde(default)]
    cors_origin: Option<String>,
}

impl ApiConfig {
    /// Loads defaults, `ribbon-api.toml`, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("ribbon-api").required(false))
            .add_source(Environment::with_prefix("RIBBON").try_parsing(true));

        Self::from_builder(builder)
    }

    /// The built-in defaults, for layering further sources on.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database_path", "./ribbon.db")?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("jwt_lifetime_secs", 86_400)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let raw: RawConfig = builder.build()?.try_deserialize()?;

        if raw.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InvalidValue {
                key: "jwt_secret".to_string(),
                reason: format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
            });
        }

        if !(1..=MAX_JWT_LIFETIME_SECS).contains(&raw.jwt_lifetime_secs) {
            return Err(ConfigError::InvalidValue {
                key: "jwt_lifetime_secs".to_string(),
                reason: format!("must be between 1 and {MAX_JWT_LIFETIME_SECS}"),
            });
        }

        Ok(ApiConfig {
            host: raw.host,
            port: raw.port,
            database_path: raw.database_path,
            jwt_secret: SecretString::from(raw.jwt_secret),
            jwt_lifetime_secs: raw.jwt_lifetime_secs,
            cors_origin: raw.cors_origin.filter(|o| !o.trim().is_empty()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEV_JWT_SECRET
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}
