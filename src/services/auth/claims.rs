use serde::Deserialize;

/// Verified access-token payload.
///
/// Only produced by `TokenAuthorizer` after signature, issuer, audience and time
/// checks pass, so there is no public constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    issuer: String,
    audience: Vec<String>,
    subject: String,
    expires_at: u64,
    not_before: Option<u64>,
    issued_at: Option<u64>,
    permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    pub fn not_before(&self) -> Option<u64> {
        self.not_before
    }

    pub fn issued_at(&self) -> Option<u64> {
        self.issued_at
    }

    /// `None` when the token carried no `permissions` claim at all.
    pub fn permissions(&self) -> Option<&[String]> {
        self.permissions.as_deref()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}

// `aud` may be a single string or an array on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    iss: String,
    aud: Audience,
    sub: String,
    exp: u64,
    #[serde(default)]
    nbf: Option<u64>,
    #[serde(default)]
    iat: Option<u64>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        let audience = match raw.aud {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        };

        Self {
            issuer: raw.iss,
            audience,
            subject: raw.sub,
            expires_at: raw.exp,
            not_before: raw.nbf,
            issued_at: raw.iat,
            permissions: raw.permissions,
        }
    }
}

/// Time-bound claims read from an unverified payload.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TemporalClaims {
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub nbf: Option<u64>,
}
