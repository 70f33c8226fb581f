//! In-memory repositories - used when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use postboard_core::domain::{NewPost, NewUser, Post, User, UserId};
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Rows plus the next id to hand out. Ids start at 1; a reset starts over.
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory user repository.
///
/// The uniqueness check and the insert happen under one write lock, so
/// concurrent signups with the same email see exactly one winner.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, NewUser> for InMemoryUserRepository {
    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|u| u.email == entity.email) {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }

        let user = entity.with_id(table.allocate_id());
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn reset(&self) -> Result<(), RepoError> {
        *self.table.write().await = Table::default();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }
}

/// In-memory post repository. Rows stay in insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost> for InMemoryPostRepository {
    async fn insert(&self, entity: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let post = entity.with_id(table.allocate_id());
        table.rows.push(post.clone());
        Ok(post)
    }

    async fn reset(&self) -> Result<(), RepoError> {
        *self.table.write().await = Table::default();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.table.read().await.rows.clone())
    }
}
