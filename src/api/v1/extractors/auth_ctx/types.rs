/*
 * Responsibility
 * - The authenticated context handlers see
 * - The guard middleware builds it from verified Claims and stores it in request extensions
 */
use crate::services::auth::Claims;

/// Context attached to a request that passed its route's permission check.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    /// The permission the route demanded (and the token carried).
    pub granted: &'static str,
}

impl AuthCtx {
    pub fn new(claims: &Claims, granted: &'static str) -> Self {
        Self {
            subject: claims.subject().to_string(),
            granted,
        }
    }
}
