//! Session storage port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{SessionToken, UserId};

/// Token-to-user binding store.
///
/// Each token is an independent conversation; implementations never need
/// locking across tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Bind `token` to `user_id`, replacing any previous binding.
    /// A `ttl` of `None` keeps the binding until it is removed.
    async fn bind(
        &self,
        token: &SessionToken,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError>;

    /// The user bound to `token`, if the binding exists and has not expired.
    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionError>;

    /// Remove the binding. Removing an unknown token is not an error.
    async fn unbind(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Remove every binding.
    async fn reset(&self) -> Result<(), SessionError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Corrupt session record: {0}")]
    Corrupt(String),
}
