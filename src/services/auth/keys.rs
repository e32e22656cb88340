//! Signing keys and the key-set seam the authorizer resolves `kid`s against.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::error::KeyFetchError;

/// A verification key plus the algorithm it is allowed to verify.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    algorithm: Algorithm,
    decoding_key: DecodingKey,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum JwkRejected {
    #[error("jwk has no kid")]
    MissingKeyId,
    #[error("jwk is an encryption key")]
    EncryptionKey,
    #[error("unsupported jwk algorithm")]
    UnsupportedAlgorithm,
    #[error("jwk key type does not match its algorithm")]
    AlgorithmMismatch,
    #[error("jwk unusable: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("unsupported jwk entry: {0}")]
    Unparseable(#[from] serde_json::Error),
}

impl SigningKey {
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, JwkRejected> {
        let kid = jwk
            .common
            .key_id
            .clone()
            .ok_or(JwkRejected::MissingKeyId)?;

        if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
            return Err(JwkRejected::EncryptionKey);
        }

        let algorithm = match jwk.common.key_algorithm {
            Some(declared) => declared_algorithm(declared)?,
            None => inferred_algorithm(&jwk.algorithm)?,
        };
        ensure_family(&jwk.algorithm, algorithm)?;

        let decoding_key = DecodingKey::from_jwk(jwk)?;

        Ok(Self {
            kid,
            algorithm,
            decoding_key,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

fn declared_algorithm(alg: KeyAlgorithm) -> Result<Algorithm, JwkRejected> {
    let algorithm = match alg {
        KeyAlgorithm::RS256 => Algorithm::RS256,
        KeyAlgorithm::RS384 => Algorithm::RS384,
        KeyAlgorithm::RS512 => Algorithm::RS512,
        KeyAlgorithm::PS256 => Algorithm::PS256,
        KeyAlgorithm::PS384 => Algorithm::PS384,
        KeyAlgorithm::PS512 => Algorithm::PS512,
        KeyAlgorithm::ES256 => Algorithm::ES256,
        KeyAlgorithm::ES384 => Algorithm::ES384,
        KeyAlgorithm::EdDSA => Algorithm::EdDSA,
        // Symmetric and key-encryption algorithms never verify issuer tokens.
        _ => return Err(JwkRejected::UnsupportedAlgorithm),
    };
    Ok(algorithm)
}

fn inferred_algorithm(params: &AlgorithmParameters) -> Result<Algorithm, JwkRejected> {
    match params {
        AlgorithmParameters::RSA(_) => Ok(Algorithm::RS256),
        AlgorithmParameters::EllipticCurve(ec) => match ec.curve {
            EllipticCurve::P256 => Ok(Algorithm::ES256),
            EllipticCurve::P384 => Ok(Algorithm::ES384),
            _ => Err(JwkRejected::UnsupportedAlgorithm),
        },
        AlgorithmParameters::OctetKeyPair(okp) if okp.curve == EllipticCurve::Ed25519 => {
            Ok(Algorithm::EdDSA)
        }
        _ => Err(JwkRejected::UnsupportedAlgorithm),
    }
}

fn ensure_family(params: &AlgorithmParameters, alg: Algorithm) -> Result<(), JwkRejected> {
    let ok = match params {
        AlgorithmParameters::RSA(_) => matches!(
            alg,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512
        ),
        AlgorithmParameters::EllipticCurve(ec) => matches!(
            (&ec.curve, alg),
            (EllipticCurve::P256, Algorithm::ES256) | (EllipticCurve::P384, Algorithm::ES384)
        ),
        AlgorithmParameters::OctetKeyPair(okp) => {
            okp.curve == EllipticCurve::Ed25519 && alg == Algorithm::EdDSA
        }
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(JwkRejected::AlgorithmMismatch)
    }
}

/// A JWKS document as published by the issuer.
///
/// Entries stay raw JSON: `Jwk` does not model every key type an issuer may
/// publish, and one foreign entry must not reject the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwksDocument {
    pub keys: Vec<Value>,
}

/// Index a JWKS document by `kid`, skipping entries that cannot verify tokens.
pub fn index_jwks(doc: &JwksDocument) -> HashMap<String, SigningKey> {
    doc.keys
        .iter()
        .filter_map(|entry| {
            let kid = entry.get("kid").and_then(Value::as_str);
            let parsed = serde_json::from_value::<Jwk>(entry.clone())
                .map_err(JwkRejected::from)
                .and_then(|jwk| SigningKey::from_jwk(&jwk));
            match parsed {
                Ok(key) => Some((key.kid.clone(), key)),
                Err(error) => {
                    warn!(kid = ?kid, error = %error, "skipping jwk");
                    None
                }
            }
        })
        .collect()
}

/// Source of signing keys for the authorizer.
///
/// `lookup` is a cheap read. `refresh` may go to the network.
#[async_trait]
pub trait SigningKeySet: Send + Sync {
    fn lookup(&self, kid: &str) -> Option<SigningKey>;

    async fn refresh(&self) -> Result<(), KeyFetchError>;
}

/// Fixed key set. `refresh` has nothing to reload.
#[derive(Debug, Clone, Default)]
pub struct StaticKeySet {
    keys: HashMap<String, SigningKey>,
}

impl StaticKeySet {
    pub fn new(keys: impl IntoIterator<Item = SigningKey>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| (k.kid.clone(), k)).collect(),
        }
    }

    pub fn from_jwks(doc: &JwksDocument) -> Self {
        Self {
            keys: index_jwks(doc),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl SigningKeySet for StaticKeySet {
    fn lookup(&self, kid: &str) -> Option<SigningKey> {
        self.keys.get(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), KeyFetchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support;
    use serde_json::json;

    fn jwk(value: serde_json::Value) -> Jwk {
        serde_json::from_value(value).expect("jwk")
    }

    #[test]
    fn declared_alg_wins() {
        let key = SigningKey::from_jwk(&jwk(test_support::rsa_jwk("k1", Some("RS384"))))
            .expect("key");
        assert_eq!(key.kid(), "k1");
        assert_eq!(key.algorithm(), Algorithm::RS384);
    }

    #[test]
    fn rsa_without_alg_defaults_to_rs256() {
        let key =
            SigningKey::from_jwk(&jwk(test_support::rsa_jwk("k1", None))).expect("key");
        assert_eq!(key.algorithm(), Algorithm::RS256);
    }

    #[test]
    fn rejects_mismatched_family() {
        let err = SigningKey::from_jwk(&jwk(test_support::rsa_jwk("k1", Some("ES256"))))
            .unwrap_err();
        assert!(matches!(err, JwkRejected::AlgorithmMismatch));
    }

    #[test]
    fn rejects_encryption_keys_and_missing_kid() {
        let mut enc = test_support::rsa_jwk("k1", Some("RS256"));
        enc["use"] = json!("enc");
        assert!(matches!(
            SigningKey::from_jwk(&jwk(enc)),
            Err(JwkRejected::EncryptionKey)
        ));

        let mut anonymous = test_support::rsa_jwk("k1", Some("RS256"));
        anonymous.as_object_mut().expect("object").remove("kid");
        assert!(matches!(
            SigningKey::from_jwk(&jwk(anonymous)),
            Err(JwkRejected::MissingKeyId)
        ));
    }

    #[test]
    fn index_skips_unusable_keys() {
        let doc: JwksDocument = serde_json::from_value(json!({
            "keys": [
                test_support::rsa_jwk("good", Some("RS256")),
                test_support::rsa_jwk("bad", Some("ES256")),
            ]
        }))
        .expect("jwks");

        let keys = StaticKeySet::from_jwks(&doc);
        assert_eq!(keys.len(), 1);
        assert!(keys.lookup("good").is_some());
        assert!(keys.lookup("bad").is_none());
    }

    #[test]
    fn foreign_entries_do_not_reject_the_set() {
        let doc: JwksDocument = serde_json::from_value(json!({
            "keys": [
                {"kty": "EC", "crv": "secp256k1", "kid": "other", "x": "AA", "y": "AA"},
                {"kty": "oct", "kid": "shared", "k": "c2VjcmV0"},
                test_support::rsa_jwk("good", Some("RS256")),
                "not even an object",
            ]
        }))
        .expect("jwks");

        let keys = StaticKeySet::from_jwks(&doc);
        assert_eq!(keys.len(), 1);
        assert!(keys.lookup("good").is_some());
    }
}
