//! In-memory session store - default when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use postboard_core::domain::{SessionToken, UserId};
use postboard_core::ports::{SessionError, SessionStore};

struct Binding {
    user_id: UserId,
    expires_at: Option<Instant>,
}

impl Binding {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Token-to-user map behind an async RwLock.
///
/// Bindings are lost on process restart and are not shared between
/// server instances.
pub struct InMemorySessionStore {
    bindings: RwLock<HashMap<SessionToken, Binding>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every expired binding. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut bindings = self.bindings.write().await;
        let before = bindings.len();
        bindings.retain(|_, binding| !binding.is_expired(now));
        before - bindings.len()
    }

    /// Number of stored bindings, expired ones included.
    pub async fn len(&self) -> usize {
        self.bindings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn bind(
        &self,
        token: &SessionToken,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError> {
        let now = Instant::now();
        let binding = Binding {
            user_id,
            expires_at: ttl.map(|d| now + d),
        };

        let mut bindings = self.bindings.write().await;
        // Expired bindings are swept on every write.
        bindings.retain(|_, existing| !existing.is_expired(now));

        if binding.is_expired(now) {
            bindings.remove(token);
        } else {
            bindings.insert(token.clone(), binding);
        }
        Ok(())
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionError> {
        let now = Instant::now();
        let bindings = self.bindings.read().await;
        let Some(binding) = bindings.get(token) else {
            return Ok(None);
        };

        if binding.is_expired(now) {
            drop(bindings);
            // Clean up expired binding with write lock
            self.bindings.write().await.remove(token);
            return Ok(None);
        }

        Ok(Some(binding.user_id))
    }

    async fn unbind(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.bindings.write().await.remove(token);
        Ok(())
    }

    async fn reset(&self) -> Result<(), SessionError> {
        self.bindings.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_resolve_unbind() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();

        store.bind(&token, 1, None).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some(1));

        store.unbind(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
        store.unbind(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_tokens_do_not_see_each_other() {
        let store = InMemorySessionStore::new();
        let a = SessionToken::generate();
        let b = SessionToken::generate();

        store.bind(&a, 1, None).await.unwrap();
        assert_eq!(store.resolve(&b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rebinding_replaces_user() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();

        store.bind(&token, 1, None).await.unwrap();
        store.bind(&token, 2, None).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_expired_binding_is_gone() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();

        store.bind(&token, 1, Some(Duration::ZERO)).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_bindings() {
        let store = InMemorySessionStore::new();
        store
            .bind(&SessionToken::generate(), 2, Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        store.bind(&SessionToken::generate(), 3, None).await.unwrap();
        store
            .bind(&SessionToken::generate(), 1, Some(Duration::from_millis(10)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_abandoned_expired_bindings_are_swept_on_bind() {
        let store = InMemorySessionStore::new();
        for user_id in 0..1000 {
            store
                .bind(&SessionToken::generate(), user_id, Some(Duration::ZERO))
                .await
                .unwrap();
        }
        assert!(store.is_empty().await);

        for user_id in 0..10 {
            store
                .bind(&SessionToken::generate(), user_id, Some(Duration::from_millis(10)))
                .await
                .unwrap();
        }
        assert_eq!(store.len().await, 10);

        tokio::time::sleep(Duration::from_millis(30)).await;
        let live = SessionToken::generate();
        store.bind(&live, 99, None).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.resolve(&live).await.unwrap(), Some(99));
    }

    #[tokio::test]
    async fn test_rebinding_with_zero_ttl_drops_previous_binding() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();

        store.bind(&token, 1, None).await.unwrap();
        store.bind(&token, 1, Some(Duration::ZERO)).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();
        store.bind(&token, 1, None).await.unwrap();

        store.reset().await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }
}
