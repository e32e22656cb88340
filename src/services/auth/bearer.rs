use std::fmt;

use super::error::AuthFailure;

/// The credential half of an `Authorization: Bearer <token>` header.
///
/// Borrowed from the header value; lives for one request.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BearerToken<'a>(&'a str);

impl<'a> BearerToken<'a> {
    /// Accepts exactly `Bearer <token>`: two tokens, one space, literal scheme.
    pub fn parse(header_value: &'a str) -> Result<Self, AuthFailure> {
        let mut parts = header_value.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(Self(token)),
            _ => Err(AuthFailure::MalformedHeader),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl fmt::Debug for BearerToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the credential
        f.write_str("BearerToken(..)")
    }
}
