use async_trait::async_trait;

use crate::domain::user::errors::AuthError;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a token for the email subject.
    ///
    /// If a user already exists with this email the new record is silently
    /// dropped and a token is still issued for that email.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    /// * `Unknown` - Hashing or token issuance failed
    async fn register(&self, command: RegisterUserCommand) -> Result<String, AuthError>;

    /// Verify credentials and issue a fresh token.
    ///
    /// # Errors
    /// * `BadCredentials` - Email unknown or password mismatch (not
    ///   distinguished)
    /// * `DatabaseError` - Store operation failed
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

/// Credential store: persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns the surrogate id.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, AuthError>;

    /// Resolve a user by unique email identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
}
