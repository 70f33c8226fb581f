//! Redis session store - shares sessions between server instances.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use postboard_core::domain::{SessionToken, UserId};
use postboard_core::ports::{SessionError, SessionStore};

/// Keys requested per SCAN page during reset.
const SCAN_BATCH: usize = 100;

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix for session keys
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "session:".to_string(),
        }
    }
}

/// Redis-backed session store.
///
/// Each binding is one string key `<prefix><token>` holding the user id;
/// TTLs map to `SET EX`.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisSessionStore {
    pub async fn new(config: RedisConfig) -> Result<Self, SessionError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| SessionError::Connection("Connection timed out".to_string()))?
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis session store");

        Ok(Self {
            conn,
            key_prefix: config.key_prefix,
        })
    }

    fn key(&self, token: &SessionToken) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn bind(
        &self,
        token: &SessionToken,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let key = self.key(token);

        match ttl {
            // SET EX rejects 0; a zero TTL binding is expired on arrival.
            Some(duration) if duration.as_secs() == 0 => {
                conn.del::<_, ()>(&key)
                    .await
                    .map_err(|e| SessionError::Operation(e.to_string()))?;
            }
            Some(duration) => {
                conn.set_ex::<_, _, ()>(&key, user_id, duration.as_secs())
                    .await
                    .map_err(|e| SessionError::Operation(e.to_string()))?;
            }
            None => {
                conn.set::<_, _, ()>(&key, user_id)
                    .await
                    .map_err(|e| SessionError::Operation(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionError> {
        let mut conn = self.conn.clone();
        let raw = conn
            .get::<_, Option<String>>(self.key(token))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        raw.map(|value| {
            value
                .parse::<UserId>()
                .map_err(|_| SessionError::Corrupt(format!("non-numeric user id {value:?}")))
        })
        .transpose()
    }

    async fn unbind(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(token))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn reset(&self) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;

        // A returned cursor of 0 ends the scan.
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| SessionError::Operation(e.to_string()))?;

            if !keys.is_empty() {
                conn.del::<_, ()>(keys)
                    .await
                    .map_err(|e| SessionError::Operation(e.to_string()))?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(())
    }
}
