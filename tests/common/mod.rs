//! Token and JWKS fixtures shared by the integration tests.
#![allow(dead_code)]

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const KID: &str = "test-key-1";
pub const DOMAIN: &str = "ex.com";
pub const ISSUER: &str = "https://ex.com/";
pub const AUDIENCE: &str = "casting";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rs256_private.pem");
const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// The fixture JWKS document, its single key published under `kid`.
pub fn jwks_with_kid(kid: &str) -> Value {
    let mut doc: Value = serde_json::from_str(JWKS_JSON).expect("fixture jwks");
    doc["keys"][0]["kid"] = json!(kid);
    doc
}

pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": "auth0|casting-director",
        "iat": now(),
        "exp": now() + 600,
        "permissions": permissions,
    })
}

pub fn mint(kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
