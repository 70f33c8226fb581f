//! Auth service - the anonymous/authenticated state machine.
//!
//! Every client conversation starts `Anonymous`. Only a successful login
//! moves it to `Authenticated`; signup never does, and logout always returns
//! to `Anonymous`.

use crate::domain::{AuthState, SessionToken, User, mask_email};
use crate::ports::AuthError;

use super::{CredentialStore, SessionManager};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// Token the client must present on later requests.
    pub token: SessionToken,
    pub user: User,
}

pub struct AuthService {
    credentials: CredentialStore,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(credentials: CredentialStore, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// Register a user. The conversation stays anonymous; the caller is
    /// expected to resubmit the same credentials to [`AuthService::login`].
    pub async fn signup(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AuthError::InvalidCredentials("email is required".to_string()))?;
        if !email.contains('@') {
            return Err(AuthError::InvalidCredentials(
                "email must be an address".to_string(),
            ));
        }
        let password = match password {
            Some(p) if p.is_empty() => {
                return Err(AuthError::InvalidCredentials(
                    "password must not be empty".to_string(),
                ));
            }
            other => other,
        };

        self.credentials.create_user(email, password).await
    }

    /// Check credentials and bind a fresh session to the user.
    ///
    /// A token already held by the client is ended first, so a conversation
    /// never keeps a token issued before authentication.
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        current: Option<&SessionToken>,
    ) -> Result<LoginSuccess, AuthError> {
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::AuthenticationFailure);
        };

        let Some(user) = self.credentials.authenticate(email, password).await? else {
            tracing::info!(email = %mask_email(email), "Login rejected");
            return Err(AuthError::AuthenticationFailure);
        };

        if let Some(previous) = current {
            self.sessions.end_session(previous).await?;
        }
        let token = self.sessions.start_session(&user).await?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginSuccess { token, user })
    }

    /// End the conversation's session, whatever its state.
    pub async fn logout(&self, current: Option<&SessionToken>) -> Result<(), AuthError> {
        if let Some(token) = current {
            self.sessions.end_session(token).await?;
            tracing::debug!("Session ended");
        }
        Ok(())
    }

    /// Who is logged in on this conversation.
    ///
    /// Never fails: a missing, unknown or unreadable session is `Anonymous`.
    pub async fn current_user(&self, current: Option<&SessionToken>) -> AuthState {
        let Some(token) = current else {
            return AuthState::Anonymous;
        };

        let user_id = match self.sessions.current_user_id(token).await {
            Ok(Some(id)) => id,
            Ok(None) => return AuthState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating as anonymous");
                return AuthState::Anonymous;
            }
        };

        match self.credentials.find_user(user_id).await {
            Ok(Some(user)) => AuthState::Authenticated(user),
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "User lookup failed, treating as anonymous");
                AuthState::Anonymous
            }
        }
    }

    /// Drop all users and sessions.
    pub async fn reset(&self) -> Result<(), AuthError> {
        self.sessions.reset().await?;
        self.credentials.reset().await
    }
}
