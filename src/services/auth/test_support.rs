//! RS256 fixtures shared by the auth unit tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use super::keys::{JwksDocument, StaticKeySet};

pub const KID: &str = "test-key-1";
pub const ISSUER_DOMAIN: &str = "ex.com";

const PRIVATE_KEY_PEM: &str = include_str!("../../../tests/fixtures/rs256_private.pem");
const JWKS_JSON: &str = include_str!("../../../tests/fixtures/jwks.json");

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

pub fn jwks() -> JwksDocument {
    serde_json::from_str(JWKS_JSON).expect("fixture jwks")
}

pub fn static_keys() -> StaticKeySet {
    StaticKeySet::from_jwks(&jwks())
}

/// The fixture RSA public key as a JWK with the given `kid` / `alg`.
pub fn rsa_jwk(kid: &str, alg: Option<&str>) -> Value {
    let template: Value = serde_json::from_str(JWKS_JSON).expect("fixture jwks");
    let mut jwk = template["keys"][0].clone();
    jwk["kid"] = json!(kid);
    match alg {
        Some(alg) => jwk["alg"] = json!(alg),
        None => {
            jwk.as_object_mut().expect("object").remove("alg");
        }
    }
    jwk
}

pub fn mint(kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    mint_with_header(header, claims)
}

pub fn mint_with_header(header: Header, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("token")
}

/// `header.payload` of `token` with the signature of `donor`.
pub fn swap_signature(token: &str, donor: &str) -> String {
    let (signed, _) = token.rsplit_once('.').expect("jwt");
    let (_, signature) = donor.rsplit_once('.').expect("jwt");
    format!("{signed}.{signature}")
}
