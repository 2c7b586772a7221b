use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Error for malformed caller input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Error for identity persistence operations
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The unique constraint on `email` rejected an insert.
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Schema bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Error for session token issuing
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

/// Credential store operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Authenticate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Register => f.write_str("credential_store.register"),
            Operation::Authenticate => f.write_str("credential_store.authenticate"),
        }
    }
}

/// Top-level error for credential store operations.
///
/// Only raised when no answer could be determined. Duplicate registration,
/// unknown email and wrong password are outcomes, not errors.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("{operation}: invalid input: {source}")]
    Validation {
        operation: Operation,
        source: ValidationError,
    },

    #[error("{operation}: password hashing failed: {source}")]
    Hashing {
        operation: Operation,
        source: auth::PasswordError,
    },

    #[error("{operation}: storage failure: {source}")]
    Storage {
        operation: Operation,
        source: StorageError,
    },

    #[error("{operation}: {source}")]
    Token {
        operation: Operation,
        source: TokenError,
    },
}

impl CredentialError {
    pub fn operation(&self) -> Operation {
        match self {
            CredentialError::Validation { operation, .. }
            | CredentialError::Hashing { operation, .. }
            | CredentialError::Storage { operation, .. }
            | CredentialError::Token { operation, .. } => *operation,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            CredentialError::Storage {
                source: StorageError::Timeout(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_operation() {
        let error = CredentialError::Storage {
            operation: Operation::Authenticate,
            source: StorageError::Unavailable("connection refused".to_string()),
        };

        assert_eq!(error.operation(), Operation::Authenticate);
        assert_eq!(
            error.to_string(),
            "credential_store.authenticate: storage failure: Storage unavailable: connection refused"
        );
    }

    #[test]
    fn test_timeout_detection() {
        let error = CredentialError::Storage {
            operation: Operation::Register,
            source: StorageError::Timeout(Duration::from_secs(5)),
        };
        assert!(error.is_timeout());

        let error = CredentialError::Token {
            operation: Operation::Authenticate,
            source: TokenError::SigningFailed("bad key".to_string()),
        };
        assert!(!error.is_timeout());
        assert_eq!(
            error.to_string(),
            "credential_store.authenticate: Token signing failed: bad key"
        );
    }
}
