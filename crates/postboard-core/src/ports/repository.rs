use async_trait::async_trait;

use crate::domain::{NewPost, NewUser, Post, User, UserId};
use crate::error::RepoError;

/// Operations every store supports: insertion with a store-assigned id,
/// and wiping all records.
#[async_trait]
pub trait BaseRepository<T, N>: Send + Sync {
    /// Persist a new entity and return it with its assigned id.
    async fn insert(&self, entity: N) -> Result<T, RepoError>;

    /// Remove every record. Used for teardown between isolated runs.
    async fn reset(&self) -> Result<(), RepoError>;
}

/// User repository.
///
/// `insert` must fail with [`RepoError::Constraint`] when the email is
/// already taken, atomically with respect to concurrent inserts.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser> {
    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Find a user by their exact email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost> {
    /// All posts in creation order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;
}
