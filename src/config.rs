/*
 * Responsibility
 * - Load settings from the environment (.env honoured via dotenvy)
 * - Validate them up front; a bad value fails startup, not the first request
 */
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::auth::AuthSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    /// `APP_ENV=production|prod` selects production; anything else is development.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("production") || raw.eq_ignore_ascii_case("prod") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// `None` runs the catalog in memory.
    pub database_url: Option<String>,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let app_env = std::env::var("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or_default();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth = auth_settings_from_env()?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth,
        })
    }
}

fn auth_settings_from_env() -> Result<AuthSettings, ConfigError> {
    let domain =
        std::env::var("AUTH0_DOMAIN").map_err(|_| ConfigError::Missing("AUTH0_DOMAIN"))?;
    if domain.trim().is_empty() {
        return Err(ConfigError::Missing("AUTH0_DOMAIN"));
    }

    let audience =
        std::env::var("API_AUDIENCE").map_err(|_| ConfigError::Missing("API_AUDIENCE"))?;
    if audience.trim().is_empty() {
        return Err(ConfigError::Missing("API_AUDIENCE"));
    }

    let mut settings = AuthSettings::for_domain(&domain, audience)
        .map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?;

    if let Ok(raw) = std::env::var("AUTH_JWKS_URL") {
        let jwks_url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?;
        settings = settings.with_jwks_url(jwks_url);
    }

    let leeway = env_u64("ACCESS_TOKEN_LEEWAY_SECONDS")?.unwrap_or(0);
    let fetch_timeout = env_u64("JWKS_FETCH_TIMEOUT_SECONDS")?
        .map(Duration::from_secs)
        .unwrap_or(AuthSettings::DEFAULT_FETCH_TIMEOUT);
    if fetch_timeout.is_zero() {
        return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
    }
    let min_refresh_interval = env_u64("JWKS_MIN_REFRESH_INTERVAL_SECONDS")?
        .map(Duration::from_secs)
        .unwrap_or(AuthSettings::DEFAULT_MIN_REFRESH_INTERVAL);

    Ok(settings
        .with_leeway(leeway)
        .with_fetch_timeout(fetch_timeout)
        .with_min_refresh_interval(min_refresh_interval))
}

// Unset → Ok(None); set but not a number → Invalid.
fn env_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(None),
    }
}
