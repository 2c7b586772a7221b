use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Stateless signer of session tokens.
///
/// Holds no record of what it issued: a token is a self-describing signed
/// claim set and the issuer forgets it as soon as it is returned.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
}

impl TokenIssuer {
    /// Create an issuer signing with `secret`.
    ///
    /// # Errors
    /// * `InvalidSecret` - The secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        Ok(Self {
            jwt_handler: JwtHandler::new(secret)?,
        })
    }

    /// Issue a token asserting `subject`, expiring `validity` from now.
    ///
    /// # Errors
    /// * `InvalidDuration` - `validity` is zero, negative, or puts the expiry
    ///   beyond the representable date range
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, validity: Duration) -> Result<String, JwtError> {
        if validity <= Duration::zero() {
            return Err(JwtError::InvalidDuration(validity.num_seconds()));
        }

        let claims = Claims::new(subject, Utc::now(), validity)?;
        self.jwt_handler.encode(&claims)
    }

    /// Check signature and expiry of a token this issuer (or one sharing its
    /// secret) produced and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim is in the past
    /// * `InvalidToken` - Signature does not match
    /// * `DecodingFailed` - Token is malformed
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

/// One-shot form of [`TokenIssuer::issue`].
pub fn issue(subject: &str, validity: Duration, secret: &[u8]) -> Result<String, JwtError> {
    TokenIssuer::new(secret)?.issue(subject, validity)
}
