pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod keys;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::TokenAuthorizer;
pub use bearer::BearerToken;
pub use claims::Claims;
pub use error::{AuthFailure, ClaimsViolation, KeyFetchError, ScopeDenial};
pub use factory::build_authorizer;
pub use jwks::{HttpJwksSource, JwksCache, JwksSource};
pub use keys::{JwksDocument, SigningKey, SigningKeySet, StaticKeySet};
pub use settings::AuthSettings;
