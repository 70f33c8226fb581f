//! Application state - shared across all handlers.

use std::sync::Arc;

use postboard_core::ports::{PasswordService, PostRepository, SessionStore, UserRepository};
use postboard_core::{AuthService, CredentialStore, PostService, SessionManager};
use postboard_infra::{
    Argon2PasswordService, DatabaseConfig, InMemoryPostRepository, InMemorySessionStore,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use postboard_infra::{PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
use postboard_infra::{RedisConfig, RedisSessionStore};

use crate::config::{AppConfig, SessionConfig};
#[cfg(test)]
use crate::middleware::error::AppError;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub session: SessionConfig,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let (users, posts) = repositories(config.database.as_ref()).await;
        let sessions = session_store(config).await;

        tracing::info!("Application state initialized");

        Self::from_parts(users, posts, sessions, passwords, config.session.clone())
    }

    /// State backed entirely by in-memory stores, for handler tests.
    ///
    /// The binary always goes through [`AppState::new`].
    #[cfg(test)]
    pub fn in_memory(passwords: Arc<dyn PasswordService>, session: SessionConfig) -> Self {
        let (users, posts) = in_memory_repositories();
        Self::from_parts(
            users,
            posts,
            Arc::new(InMemorySessionStore::new()),
            passwords,
            session,
        )
    }

    fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        sessions: Arc<dyn SessionStore>,
        passwords: Arc<dyn PasswordService>,
        session: SessionConfig,
    ) -> Self {
        let auth = AuthService::new(
            CredentialStore::new(users, passwords),
            SessionManager::new(sessions, session.ttl),
        );

        Self {
            auth: Arc::new(auth),
            posts: Arc::new(PostService::new(posts)),
            session,
        }
    }

    /// Remove every user, post and session.
    ///
    /// Teardown between test runs; no route exposes it.
    #[cfg(test)]
    pub async fn reset(&self) -> Result<(), AppError> {
        self.auth.reset().await?;
        self.posts.reset().await?;
        tracing::info!("Application state reset");
        Ok(())
    }
}

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    let conn = match postboard_infra::database::connect(config).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return in_memory_repositories();
        }
    };

    // Create missing tables before serving.
    if let Err(e) = Migrator::up(&conn, None).await {
        tracing::error!("Failed to apply migrations: {}. Using in-memory fallback.", e);
        return in_memory_repositories();
    }

    (
        Arc::new(PostgresUserRepository::new(conn.clone())),
        Arc::new(PostgresPostRepository::new(conn)),
    )
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}

#[cfg(feature = "redis")]
async fn session_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    let Some(url) = config.redis_url.clone() else {
        tracing::info!("REDIS_URL not set. Sessions kept in memory.");
        return Arc::new(InMemorySessionStore::new());
    };

    let redis_config = RedisConfig {
        url,
        connect_timeout: config.redis_connect_timeout,
        ..RedisConfig::default()
    };
    match RedisSessionStore::new(redis_config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using in-memory session store.",
                e
            );
            Arc::new(InMemorySessionStore::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn session_store(_config: &AppConfig) -> Arc<dyn SessionStore> {
    tracing::info!("Running without redis feature - sessions kept in memory");
    Arc::new(InMemorySessionStore::new())
}
