//! Minimal port implementations for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NewPost, NewUser, Post, SessionToken, User, UserId};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, PostRepository, SessionError, SessionStore,
    UserRepository,
};

#[derive(Default)]
pub struct FakeUsers(Mutex<Vec<User>>);

impl FakeUsers {
    pub fn count_with_email(&self, email: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|u| u.email == email).count()
    }
}

#[async_trait]
impl BaseRepository<User, NewUser> for FakeUsers {
    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        let mut users = self.0.lock().unwrap();
        if users.iter().any(|u| u.email == entity.email) {
            return Err(RepoError::Constraint("users.email".to_string()));
        }
        let user = entity.with_id(users.len() as UserId + 1);
        users.push(user.clone());
        Ok(user)
    }

    async fn reset(&self) -> Result<(), RepoError> {
        self.0.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakePosts(Mutex<Vec<Post>>);

#[async_trait]
impl BaseRepository<Post, NewPost> for FakePosts {
    async fn insert(&self, entity: NewPost) -> Result<Post, RepoError> {
        let mut posts = self.0.lock().unwrap();
        let post = entity.with_id(posts.len() as i64 + 1);
        posts.push(post.clone());
        Ok(post)
    }

    async fn reset(&self) -> Result<(), RepoError> {
        self.0.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Session store that records TTLs without enforcing them and can be told
/// to fail.
#[derive(Default)]
pub struct FakeSessions {
    bindings: Mutex<HashMap<SessionToken, UserId>>,
    ttls: Mutex<Vec<Option<Duration>>>,
    pub broken: Mutex<bool>,
}

impl FakeSessions {
    pub fn len(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }

    /// TTLs passed to `bind`, oldest first.
    pub fn ttls(&self) -> Vec<Option<Duration>> {
        self.ttls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), SessionError> {
        if *self.broken.lock().unwrap() {
            return Err(SessionError::Connection("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn bind(
        &self,
        token: &SessionToken,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError> {
        self.check()?;
        self.ttls.lock().unwrap().push(ttl);
        self.bindings.lock().unwrap().insert(token.clone(), user_id);
        Ok(())
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionError> {
        self.check()?;
        Ok(self.bindings.lock().unwrap().get(token).copied())
    }

    async fn unbind(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.check()?;
        self.bindings.lock().unwrap().remove(token);
        Ok(())
    }

    async fn reset(&self) -> Result<(), SessionError> {
        self.bindings.lock().unwrap().clear();
        Ok(())
    }
}

/// Reversible "hash" that still keeps plaintext out of the stored field.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${}", password.chars().rev().collect::<String>()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(self.hash(password)? == hash)
    }
}

/// [`PlainPasswords`] that counts how often each operation runs.
#[derive(Default)]
pub struct CountingPasswords {
    hashes: AtomicUsize,
    verifies: AtomicUsize,
}

impl CountingPasswords {
    pub fn hashes(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl PasswordService for CountingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        PlainPasswords.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        Ok(PlainPasswords.hash(password)? == hash)
    }
}
