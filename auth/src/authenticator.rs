use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token
/// issuance.
///
/// Holds the only mutable-free state the authentication flow needs: the
/// hashing primitive and the signing key, both safe for concurrent use.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the given signing key.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// The supplied password is hashed and compared against `stored_hash`;
    /// on match a fresh token is issued for `subject` with the given
    /// validity window and no extra claims.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        validity: Duration,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject, validity)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// Used by registration, where the caller has just created the
    /// credentials being attested.
    ///
    /// # Errors
    /// * `JwtError` - Token issuance failed
    pub fn issue_token(&self, subject: &str, validity: Duration) -> Result<String, JwtError> {
        self.jwt_handler
            .issue(subject, std::collections::HashMap::new(), validity)
    }

    /// Extract the subject from a verified token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation failed or `sub` is absent
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.jwt_handler.extract_subject(token)
    }

    /// Check a token against an expected subject.
    ///
    /// Never errors; any failure collapses to `false`.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.jwt_handler.is_valid(token, expected_subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "alice@example.com", Duration::hours(24))
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let subject = authenticator
            .extract_subject(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET);

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate(
            "wrong_password",
            &hash,
            "alice@example.com",
            Duration::hours(24),
        );
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_token_and_validate() {
        let authenticator = Authenticator::new(SECRET);

        let token = authenticator
            .issue_token("alice@example.com", Duration::hours(24))
            .expect("Failed to issue token");

        assert!(authenticator.is_valid(&token, "alice@example.com"));
        assert!(!authenticator.is_valid(&token, "bob@example.com"));
    }

    #[test]
    fn test_extract_subject_invalid_token() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.extract_subject("invalid.token.here");
        assert!(result.is_err());
    }
}
