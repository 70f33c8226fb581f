//! Authentication ports and errors.

use crate::error::RepoError;
use crate::ports::SessionError;

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Signup input missing or malformed.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Email already registered")]
    DuplicateEmail,

    /// Login credentials did not match a user.
    #[error("Authentication failed")]
    AuthenticationFailure,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Session backend error: {0}")]
    Session(#[from] SessionError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),
}
