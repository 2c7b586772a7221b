use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;

use crate::identity::errors::CredentialError;
use crate::identity::errors::Operation;
use crate::identity::errors::StorageError;
use crate::identity::models::AuthenticationOutcome;
use crate::identity::models::Credentials;
use crate::identity::models::NewIdentity;
use crate::identity::models::RegistrationOutcome;
use crate::identity::models::SessionToken;
use crate::identity::ports::CredentialStorePort;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::SessionTokenIssuer;

/// Domain service registering and authenticating identities.
///
/// Concrete implementation of CredentialStorePort with dependency injection.
pub struct CredentialStore<IR, TI>
where
    IR: IdentityRepository,
    TI: SessionTokenIssuer,
{
    repository: Arc<IR>,
    token_issuer: Arc<TI>,
    password_hasher: PasswordHasher,
    token_validity: chrono::Duration,
}

impl<IR, TI> CredentialStore<IR, TI>
where
    IR: IdentityRepository,
    TI: SessionTokenIssuer,
{
    /// Create a new credential store with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `token_issuer` - Session token signer
    /// * `password_hasher` - Hasher carrying the configured cost
    /// * `token_validity` - Lifetime of issued tokens
    pub fn new(
        repository: Arc<IR>,
        token_issuer: Arc<TI>,
        password_hasher: PasswordHasher,
        token_validity: chrono::Duration,
    ) -> Self {
        Self {
            repository,
            token_issuer,
            password_hasher,
            token_validity,
        }
    }

    // Argon2 is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?
    }

    async fn waste_verification(&self, password: &str) {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        let _ = tokio::task::spawn_blocking(move || hasher.waste_verification(&password)).await;
    }
}

fn storage_error(operation: Operation) -> impl FnOnce(StorageError) -> CredentialError {
    move |source| CredentialError::Storage { operation, source }
}

fn hashing_error(operation: Operation) -> impl FnOnce(PasswordError) -> CredentialError {
    move |source| CredentialError::Hashing { operation, source }
}

#[async_trait]
impl<IR, TI> CredentialStorePort for CredentialStore<IR, TI>
where
    IR: IdentityRepository,
    TI: SessionTokenIssuer,
{
    #[tracing::instrument(name = "credential_store.register", skip_all)]
    async fn register(
        &self,
        credentials: Credentials,
    ) -> Result<RegistrationOutcome, CredentialError> {
        let operation = Operation::Register;

        // Fast path only; the unique constraint below is what guarantees
        // a single identity per email.
        let exists = self
            .repository
            .exists(&credentials.email)
            .await
            .map_err(storage_error(operation))?;
        if exists {
            tracing::debug!("Email already registered");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let password_hash = self
            .hash_password(credentials.password())
            .await
            .map_err(hashing_error(operation))?;

        let new_identity = NewIdentity {
            email: credentials.email,
            password_hash,
        };

        match self.repository.create(new_identity).await {
            Ok(identity) => {
                tracing::info!(identity_id = %identity.id, "Identity registered");
                Ok(RegistrationOutcome::Created)
            }
            Err(StorageError::EmailAlreadyExists) => {
                tracing::debug!("Email registered concurrently");
                Ok(RegistrationOutcome::AlreadyRegistered)
            }
            Err(source) => Err(CredentialError::Storage { operation, source }),
        }
    }

    #[tracing::instrument(name = "credential_store.authenticate", skip_all)]
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticationOutcome, CredentialError> {
        let operation = Operation::Authenticate;

        let identity = self
            .repository
            .find_by_email(&credentials.email)
            .await
            .map_err(storage_error(operation))?;

        let Some(identity) = identity else {
            self.waste_verification(credentials.password()).await;
            tracing::debug!("Authentication rejected");
            return Ok(AuthenticationOutcome::Rejected);
        };

        let matches = self
            .verify_password(credentials.password(), &identity.password_hash)
            .await
            .map_err(hashing_error(operation))?;
        if !matches {
            tracing::debug!("Authentication rejected");
            return Ok(AuthenticationOutcome::Rejected);
        }

        let token = self
            .token_issuer
            .issue(&identity.email, self.token_validity)
            .map_err(|source| CredentialError::Token { operation, source })?;

        tracing::info!(identity_id = %identity.id, "Identity authenticated");

        Ok(AuthenticationOutcome::Authenticated(SessionToken::new(token)))
    }
}
