//! Authentication utilities library
//!
//! Provides the primitives the identity service delegates to:
//! - Password hashing (Argon2id)
//! - Signed token issuance and validation (JWT, HS256)
//! - Authentication coordination
//!
//! The service defines its own domain traits and adapts these
//! implementations, keeping the cryptographic concerns out of domain code.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use std::collections::HashMap;
//!
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler
//!     .issue("alice@example.com", HashMap::new(), Duration::hours(24))
//!     .unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("alice@example.com"));
//! assert!(handler.is_valid(&token, "alice@example.com"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password, then issue a token
//! let hash = auth.hash_password("password123").unwrap();
//! let registration_token = auth.issue_token("alice@example.com", Duration::hours(24)).unwrap();
//! assert!(auth.is_valid(&registration_token, "alice@example.com"));
//!
//! // Login: verify credentials and issue a fresh token
//! let result = auth
//!     .authenticate("password123", &hash, "alice@example.com", Duration::hours(24))
//!     .unwrap();
//!
//! // Per-request validation
//! assert!(auth.is_valid(&result.access_token, "alice@example.com"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
