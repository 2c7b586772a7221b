use async_trait::async_trait;

use crate::identity::errors::CredentialError;
use crate::identity::errors::StorageError;
use crate::identity::errors::TokenError;
use crate::identity::models::AuthenticationOutcome;
use crate::identity::models::Credentials;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::NewIdentity;
use crate::identity::models::RegistrationOutcome;

/// Port for credential store operations.
#[async_trait]
pub trait CredentialStorePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `credentials` - Email and plaintext password
    ///
    /// # Returns
    /// `Created` when a new identity was stored, `AlreadyRegistered` when the
    /// email was taken (including by a concurrent registration)
    ///
    /// # Errors
    /// * `Hashing` - Password could not be hashed; nothing was stored
    /// * `Storage` - Store unreachable, timed out, or failed
    async fn register(&self, credentials: Credentials)
        -> Result<RegistrationOutcome, CredentialError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `credentials` - Email and plaintext password
    ///
    /// # Returns
    /// `Authenticated` with a signed token, or `Rejected` for an unknown
    /// email or wrong password
    ///
    /// # Errors
    /// * `Hashing` - Stored hash could not be verified
    /// * `Storage` - Store unreachable, timed out, or failed
    /// * `Token` - Token signing failed
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticationOutcome, CredentialError>;
}

/// Persistence operations for identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Check whether an identity exists for `email`.
    ///
    /// # Errors
    /// * `Timeout` / `Unavailable` / `DatabaseError` - Store failure
    async fn exists(&self, email: &EmailAddress) -> Result<bool, StorageError>;

    /// Insert a new identity in a single statement.
    ///
    /// # Returns
    /// The stored identity with its assigned id
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Unique constraint on email was violated
    /// * `Timeout` / `Unavailable` / `DatabaseError` - Store failure
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StorageError>;

    /// Retrieve the identity stored for `email`.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Timeout` / `Unavailable` / `DatabaseError` - Store failure
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, StorageError>;
}

/// Signs session tokens for authenticated identities.
pub trait SessionTokenIssuer: Send + Sync + 'static {
    /// Issue a token for `subject` valid for `validity`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token could not be produced
    fn issue(&self, subject: &EmailAddress, validity: chrono::Duration)
        -> Result<String, TokenError>;
}
