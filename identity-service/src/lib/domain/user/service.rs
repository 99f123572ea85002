use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Role;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service orchestrating registration and login.
///
/// Maps requests onto the credential store and the token codec; holds no
/// mutable state of its own.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
    token_validity: Duration,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token issuance coordinator
    /// * `token_validity_hours` - Validity window for issued tokens
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>, token_validity_hours: i64) -> Self {
        Self {
            repository,
            authenticator,
            token_validity: Duration::hours(token_validity_hours),
        }
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<String, AuthError> {
        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let email = command.email.as_str().to_string();

        if self.repository.find_by_email(&email).await?.is_none() {
            let user = NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                email: command.email,
                password_hash,
                role: Role::User,
                created_at: Utc::now(),
            };

            self.repository.create(user).await?;
        } else {
            // Registration against an existing email is a persistence no-op;
            // the caller still receives a token for that email
            tracing::debug!(email = %email, "Duplicate registration, record not persisted");
        }

        self.authenticator
            .issue_token(&email, self.token_validity)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        let result = self
            .authenticator
            .authenticate(
                password,
                &user.password_hash,
                user.email.as_str(),
                self.token_validity,
            )
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => AuthError::BadCredentials,
                other => AuthError::Unknown(other.to_string()),
            })?;

        Ok(result.access_token)
    }
}
