//! Session manager - binds client conversations to users.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{SessionToken, User, UserId};
use crate::ports::{SessionError, SessionStore};

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Option<Duration>,
}

impl SessionManager {
    /// `ttl` of `None` means sessions last until logout.
    pub fn new(store: Arc<dyn SessionStore>, ttl: Option<Duration>) -> Self {
        Self { store, ttl }
    }

    /// Open a new conversation bound to `user` and return its token.
    pub async fn start_session(&self, user: &User) -> Result<SessionToken, SessionError> {
        let token = SessionToken::generate();
        self.store.bind(&token, user.id, self.ttl).await?;
        tracing::debug!(user_id = user.id, "Session started");
        Ok(token)
    }

    /// The user bound to `token`, if any.
    pub async fn current_user_id(&self, token: &SessionToken) -> Result<Option<UserId>, SessionError> {
        self.store.resolve(token).await
    }

    /// Clear the binding. Ending an unbound token is a no-op.
    pub async fn end_session(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.store.unbind(token).await
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        self.store.reset().await
    }
}
