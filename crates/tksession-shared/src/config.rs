//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::constants::{DEFAULT_SESSION_HEADER, DEFAULT_SESSION_TIMEOUT_SECONDS};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Server-held secret the token encryption key is derived from
    pub secret: String,
    /// Header carrying the token; read by the transport layer only
    pub header: String,
    /// Default TTL for newly created sessions
    pub timeout_seconds: i64,
}

impl SessionSettings {
    /// Default TTL as the session layer stores it: non-negative, at most `i32::MAX`.
    pub fn default_ttl(&self) -> i32 {
        i32::try_from(self.timeout_seconds.max(0)).unwrap_or(i32::MAX)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let app_config = Self::from_config(config)?;
        info!(
            "Session configuration loaded: header={}, timeout={}s",
            app_config.session.header, app_config.session.timeout_seconds
        );
        Ok(app_config)
    }

    /// Builder pre-populated with every default; callers add their own sources.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(Config::builder()
            .set_default("session.secret", "")?
            .set_default("session.header", DEFAULT_SESSION_HEADER)?
            .set_default("session.timeout_seconds", DEFAULT_SESSION_TIMEOUT_SECONDS)?)
    }

    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let app_config: AppConfig = config.try_deserialize()?;
        if app_config.session.secret.trim().is_empty() {
            return Err(AppError::MissingSecret);
        }
        Ok(app_config)
    }
}
