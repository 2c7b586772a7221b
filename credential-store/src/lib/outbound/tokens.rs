use auth::TokenIssuer;

use crate::identity::errors::TokenError;
use crate::identity::models::EmailAddress;
use crate::identity::ports::SessionTokenIssuer;

impl SessionTokenIssuer for TokenIssuer {
    fn issue(
        &self,
        subject: &EmailAddress,
        validity: chrono::Duration,
    ) -> Result<String, TokenError> {
        TokenIssuer::issue(self, subject.as_str(), validity)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}
