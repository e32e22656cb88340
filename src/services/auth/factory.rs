//! Builds the process-wide `TokenAuthorizer` from `Config`:
//! an HTTP JWKS source behind a refresh-on-miss cache.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{HttpJwksSource, JwksCache, TokenAuthorizer};

pub fn build_authorizer(config: &Config) -> Result<Arc<TokenAuthorizer>, AppError> {
    let settings = config.auth.clone();

    let source = HttpJwksSource::new(settings.jwks_url.clone(), settings.fetch_timeout).map_err(
        |e| {
            tracing::error!(error = %e, "failed to build jwks client");
            AppError::Internal
        },
    )?;
    let keys = JwksCache::new(source, settings.min_refresh_interval);

    tracing::info!(
        issuer = %settings.issuer,
        audience = %settings.audience,
        jwks_url = %settings.jwks_url,
        "token authorizer configured"
    );

    Ok(Arc::new(TokenAuthorizer::new(settings, Arc::new(keys))))
}
