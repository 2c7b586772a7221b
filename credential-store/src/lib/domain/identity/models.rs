use std::fmt;

use crate::identity::errors::ValidationError;

/// Stored identity record.
///
/// Represents one registered user
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Store-generated surrogate key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Email address used as the natural key of an identity.
///
/// Canonicalised on construction: surrounding whitespace is trimmed and the
/// address is lowercased, so `" A@X.com"` and `"a@x.com"` name the same
/// identity. No further format checks are made.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a canonical email address.
    ///
    /// # Errors
    /// * `EmptyEmail` - Nothing left after trimming
    pub fn new(email: &str) -> Result<Self, ValidationError> {
        let canonical = email.trim().to_lowercase();
        if canonical.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email and plaintext password supplied by a caller.
///
/// The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    password: String,
}

impl Credentials {
    /// Build credentials from raw caller input.
    ///
    /// # Errors
    /// * `EmptyEmail` - Email is blank
    /// * `EmptyPassword` - Password is empty
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, ValidationError> {
        let email = EmailAddress::new(email)?;
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed session token handed back to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Result of a registration attempt that reached an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    AlreadyRegistered,
}

impl RegistrationOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, RegistrationOutcome::Created)
    }
}

/// Result of an authentication attempt that reached an answer.
///
/// Unknown email and wrong password both yield `Rejected`; callers cannot
/// tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated(SessionToken),
    Rejected,
}

impl AuthenticationOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthenticationOutcome::Authenticated(_))
    }

    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            AuthenticationOutcome::Authenticated(token) => Some(token),
            AuthenticationOutcome::Rejected => None,
        }
    }

    pub fn into_token(self) -> Option<SessionToken> {
        match self {
            AuthenticationOutcome::Authenticated(token) => Some(token),
            AuthenticationOutcome::Rejected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_canonicalised() {
        let email = EmailAddress::new("  Alice@Example.COM \n").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email, EmailAddress::new("alice@example.com").unwrap());
    }

    #[test]
    fn test_blank_email_rejected() {
        assert_eq!(EmailAddress::new(""), Err(ValidationError::EmptyEmail));
        assert_eq!(EmailAddress::new("   "), Err(ValidationError::EmptyEmail));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = Credentials::new("a@x.com", "");
        assert!(matches!(result, Err(ValidationError::EmptyPassword)));
    }

    #[test]
    fn test_password_is_not_trimmed() {
        let credentials = Credentials::new("a@x.com", " pw ").unwrap();
        assert_eq!(credentials.password(), " pw ");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let credentials = Credentials::new("a@x.com", "hunter2").unwrap();
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("a@x.com"));
        assert!(!rendered.contains("hunter2"));

        let token = SessionToken::new("header.payload.signature".to_string());
        assert!(!format!("{:?}", token).contains("payload"));
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = AuthenticationOutcome::Authenticated(SessionToken::new("t".to_string()));
        assert!(outcome.is_authenticated());
        assert_eq!(outcome.token().map(SessionToken::as_str), Some("t"));

        assert!(!AuthenticationOutcome::Rejected.is_authenticated());
        assert!(AuthenticationOutcome::Rejected.into_token().is_none());
        assert!(RegistrationOutcome::Created.is_created());
        assert!(!RegistrationOutcome::AlreadyRegistered.is_created());
    }
}
