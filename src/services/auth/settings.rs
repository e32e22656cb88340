use std::time::Duration;

use url::Url;

/// Issuer/audience the authorizer trusts and how it talks to the issuer's JWKS.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Exact `iss` value, `https://<domain>/`.
    pub issuer: String,
    pub audience: String,
    pub jwks_url: Url,
    pub leeway_seconds: u64,
    pub fetch_timeout: Duration,
    /// Zero disables refresh rate limiting.
    pub min_refresh_interval: Duration,
}

impl AuthSettings {
    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

    /// Settings for a tenant domain such as `example.eu.auth0.com`.
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Result<Self, url::ParseError> {
        let domain = domain
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');
        let issuer = format!("https://{domain}/");
        let jwks_url = Url::parse(&issuer)?.join(".well-known/jwks.json")?;

        Ok(Self {
            issuer,
            audience: audience.into(),
            jwks_url,
            leeway_seconds: 0,
            fetch_timeout: Self::DEFAULT_FETCH_TIMEOUT,
            min_refresh_interval: Self::DEFAULT_MIN_REFRESH_INTERVAL,
        })
    }

    pub fn with_jwks_url(mut self, jwks_url: Url) -> Self {
        self.jwks_url = jwks_url;
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }
}
