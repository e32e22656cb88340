//! Bearer-token authorization against an issuer's signing keys.
//!
//! Order of checks:
//! 1. header shape (`Bearer <token>`)
//! 2. token header → `kid`
//! 3. `kid` → signing key (one key-set refresh on miss)
//! 4. `exp` / `nbf` on the unverified payload, so expired tokens fail the same way
//!    whatever their signature or header `alg`
//! 5. header `alg` against the key, then signature + `iss` / `aud` / `exp` / `nbf`
//!    via `jsonwebtoken::Validation`
//! 6. required permission ∈ `permissions`

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::Validation;
use tracing::debug;

use super::bearer::BearerToken;
use super::claims::{Claims, RawClaims, TemporalClaims};
use super::error::{AuthFailure, ClaimsViolation, ScopeDenial};
use super::keys::{SigningKey, SigningKeySet};
use super::settings::AuthSettings;

pub struct TokenAuthorizer {
    settings: AuthSettings,
    keys: Arc<dyn SigningKeySet>,
}

impl fmt::Debug for TokenAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthorizer")
            .field("issuer", &self.settings.issuer)
            .field("audience", &self.settings.audience)
            .finish()
    }
}

impl TokenAuthorizer {
    pub fn new(settings: AuthSettings, keys: Arc<dyn SigningKeySet>) -> Self {
        Self { settings, keys }
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Verify `Authorization` header value and require `required_permission`.
    pub async fn authorize(
        &self,
        header_value: &str,
        required_permission: &str,
    ) -> Result<Claims, AuthFailure> {
        let token = BearerToken::parse(header_value)?;
        let claims = self.verify(token).await?;

        match claims.permissions() {
            None => Err(AuthFailure::InsufficientScope {
                required: required_permission.to_string(),
                denial: ScopeDenial::PermissionsClaimMissing,
            }),
            Some(_) if !claims.has_permission(required_permission) => {
                Err(AuthFailure::InsufficientScope {
                    required: required_permission.to_string(),
                    denial: ScopeDenial::NotGranted,
                })
            }
            Some(_) => Ok(claims),
        }
    }

    /// Signature and claims checks, no scope check.
    pub async fn verify(&self, token: BearerToken<'_>) -> Result<Claims, AuthFailure> {
        let token = token.as_str();

        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthFailure::MalformedToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthFailure::MalformedToken("token header has no kid".into()))?;

        let key = self.resolve_key(&kid).await?;
        self.check_time_bounds(token)?;

        if header.alg != key.algorithm() {
            debug!(
                kid = %kid,
                token_alg = ?header.alg,
                key_alg = ?key.algorithm(),
                "token algorithm does not match signing key"
            );
            return Err(AuthFailure::InvalidSignature);
        }

        let data = jsonwebtoken::decode::<RawClaims>(
            token,
            key.decoding_key(),
            &self.validation(&key),
        )?;

        Ok(data.claims.into())
    }

    async fn resolve_key(&self, kid: &str) -> Result<SigningKey, AuthFailure> {
        if let Some(key) = self.keys.lookup(kid) {
            return Ok(key);
        }

        debug!(kid = %kid, "signing key not cached; refreshing key set");
        self.keys.refresh().await?;

        self.keys
            .lookup(kid)
            .ok_or_else(|| AuthFailure::UnknownSigningKey {
                kid: kid.to_string(),
            })
    }

    fn validation(&self, key: &SigningKey) -> Validation {
        let mut validation = Validation::new(key.algorithm());
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_audience(&[self.settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.settings.leeway_seconds;
        validation
    }

    fn check_time_bounds(&self, token: &str) -> Result<(), AuthFailure> {
        let temporal = peek_temporal_claims(token)?;
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let leeway = self.settings.leeway_seconds;

        if let Some(exp) = temporal.exp
            && exp.saturating_add(leeway) <= now
        {
            return Err(ClaimsViolation::Expired.into());
        }
        if let Some(nbf) = temporal.nbf
            && nbf > now.saturating_add(leeway)
        {
            return Err(ClaimsViolation::NotYetValid.into());
        }
        Ok(())
    }
}

fn peek_temporal_claims(token: &str) -> Result<TemporalClaims, AuthFailure> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthFailure::MalformedToken("token has no payload segment".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthFailure::MalformedToken(format!("payload is not base64url: {e}")))?;

    // Not JSON at all is a broken token; JSON with mistyped claims is a claims failure.
    let payload: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| AuthFailure::MalformedToken(format!("payload is not json: {e}")))?;

    serde_json::from_value(payload)
        .map_err(|e| ClaimsViolation::Malformed(format!("payload: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support::{self, ISSUER_DOMAIN, KID, now};
    use serde_json::{Value, json};

    fn authorizer() -> TokenAuthorizer {
        let settings = AuthSettings::for_domain(ISSUER_DOMAIN, "api").expect("settings");
        TokenAuthorizer::new(settings, Arc::new(test_support::static_keys()))
    }

    fn claims_json(permissions: Value) -> Value {
        json!({
            "iss": "https://ex.com/",
            "aud": "api",
            "sub": "auth0|casting-assistant",
            "iat": now(),
            "exp": now() + 3600,
            "permissions": permissions,
        })
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn grants_when_permission_present() {
        let payload = claims_json(json!(["read:actor"]));
        let token = test_support::mint(KID, &payload);

        let claims = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .expect("authorized");

        let decoded: Claims = serde_json::from_value::<RawClaims>(payload)
            .expect("raw")
            .into();
        assert_eq!(claims, decoded);
        assert_eq!(claims.permissions(), Some(&["read:actor".to_string()][..]));
        assert_eq!(claims.subject(), "auth0|casting-assistant");
    }

    #[tokio::test]
    async fn denies_missing_permission() {
        let token = test_support::mint(KID, &claims_json(json!(["read:actor"])));

        let err = authorizer()
            .authorize(&bearer(&token), "delete:actor")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthFailure::InsufficientScope {
                denial: ScopeDenial::NotGranted,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn absent_permissions_claim_is_insufficient_scope() {
        let mut payload = claims_json(json!([]));
        payload.as_object_mut().expect("object").remove("permissions");
        let token = test_support::mint(KID, &payload);

        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthFailure::InsufficientScope {
                denial: ScopeDenial::PermissionsClaimMissing,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_header_is_rejected_before_token_work() {
        let token = test_support::mint(KID, &claims_json(json!(["read:actor"])));
        for header in [token.clone(), format!("Token {token}"), format!("bearer {token}")] {
            let err = authorizer().authorize(&header, "read:actor").await.unwrap_err();
            assert!(matches!(err, AuthFailure::MalformedHeader), "{header}");
        }
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let err = authorizer()
            .authorize("Bearer not-a-jwt", "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::MalformedToken(_)));
    }

    #[tokio::test]
    async fn token_without_kid_is_malformed() {
        let token = test_support::mint_with_header(
            jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims_json(json!(["read:actor"])),
        );
        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::MalformedToken(_)));
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected() {
        let token = test_support::mint("rotated-away", &claims_json(json!(["read:actor"])));
        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::UnknownSigningKey { kid } if kid == "rotated-away"));
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let granted = test_support::mint(KID, &claims_json(json!(["read:actor"])));
        let other = test_support::mint(KID, &claims_json(json!(["delete:actor"])));
        let forged = test_support::swap_signature(&other, &granted);

        let err = authorizer()
            .authorize(&bearer(&forged), "delete:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidSignature));
    }

    #[tokio::test]
    async fn algorithm_must_match_the_key() {
        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS384);
        header.kid = Some(KID.to_string());
        let token = test_support::mint_with_header(header, &claims_json(json!(["read:actor"])));

        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidSignature));
    }

    #[tokio::test]
    async fn expired_token_fails_claims_even_with_bad_signature() {
        let mut payload = claims_json(json!(["read:actor"]));
        payload["exp"] = json!(now() - 3600);
        let expired = test_support::mint(KID, &payload);
        let err = authorizer()
            .authorize(&bearer(&expired), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::Expired)));

        let valid = test_support::mint(KID, &claims_json(json!(["read:actor"])));
        let forged = test_support::swap_signature(&expired, &valid);
        let err = authorizer()
            .authorize(&bearer(&forged), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::Expired)));

        let mut rs384 = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS384);
        rs384.kid = Some(KID.to_string());
        let wrong_alg = test_support::mint_with_header(rs384, &payload);
        let err = authorizer()
            .authorize(&bearer(&wrong_alg), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::Expired)));
    }

    #[tokio::test]
    async fn payload_that_is_not_json_is_malformed() {
        let token = test_support::mint(KID, &claims_json(json!(["read:actor"])));
        let mut segments = token.split('.');
        let (header, _, signature) = (
            segments.next().expect("header"),
            segments.next().expect("payload"),
            segments.next().expect("signature"),
        );
        let broken = format!(
            "{header}.{}.{signature}",
            URL_SAFE_NO_PAD.encode("not json at all")
        );

        let err = authorizer()
            .authorize(&bearer(&broken), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::MalformedToken(_)), "{err:?}");
    }

    #[tokio::test]
    async fn mistyped_time_claim_is_a_claims_failure() {
        let mut payload = claims_json(json!(["read:actor"]));
        payload["exp"] = json!("tomorrow");
        let token = test_support::mint(KID, &payload);

        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::Malformed(_))));
    }

    #[tokio::test]
    async fn not_yet_valid_token_is_rejected() {
        let mut payload = claims_json(json!(["read:actor"]));
        payload["nbf"] = json!(now() + 600);
        let token = test_support::mint(KID, &payload);

        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::NotYetValid)));
    }

    #[tokio::test]
    async fn audience_and_issuer_must_match() {
        let mut wrong_aud = claims_json(json!(["read:actor"]));
        wrong_aud["aud"] = json!(["other-api"]);
        let err = authorizer()
            .authorize(&bearer(&test_support::mint(KID, &wrong_aud)), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::InvalidAudience)));

        let mut wrong_iss = claims_json(json!(["read:actor"]));
        wrong_iss["iss"] = json!("https://ex.com");
        let err = authorizer()
            .authorize(&bearer(&test_support::mint(KID, &wrong_iss)), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::InvalidIssuer)));
    }

    #[tokio::test]
    async fn audience_array_containing_api_is_accepted() {
        let mut payload = claims_json(json!(["read:movie"]));
        payload["aud"] = json!(["api", "https://ex.com/userinfo"]);
        let token = test_support::mint(KID, &payload);

        let claims = authorizer()
            .authorize(&bearer(&token), "read:movie")
            .await
            .expect("authorized");
        assert_eq!(claims.audience().len(), 2);
    }

    #[tokio::test]
    async fn missing_subject_is_a_claims_failure() {
        let mut payload = claims_json(json!(["read:actor"]));
        payload.as_object_mut().expect("object").remove("sub");
        let token = test_support::mint(KID, &payload);

        let err = authorizer()
            .authorize(&bearer(&token), "read:actor")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthFailure::InvalidClaims(ClaimsViolation::MissingClaim(ref claim)) if claim == "sub"
        ));
    }

    #[tokio::test]
    async fn leeway_tolerates_small_clock_skew() {
        let mut payload = claims_json(json!(["read:actor"]));
        payload["exp"] = json!(now() - 30);
        let header = bearer(&test_support::mint(KID, &payload));

        let err = authorizer().authorize(&header, "read:actor").await.unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidClaims(ClaimsViolation::Expired)));

        let lenient = TokenAuthorizer::new(
            AuthSettings::for_domain(ISSUER_DOMAIN, "api")
                .expect("settings")
                .with_leeway(120),
            Arc::new(test_support::static_keys()),
        );
        lenient
            .authorize(&header, "read:actor")
            .await
            .expect("within leeway");
    }
}
