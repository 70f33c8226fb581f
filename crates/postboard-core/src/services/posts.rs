//! Post service - the shared feed.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostDraft};
use crate::error::DomainError;
use crate::ports::PostRepository;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Store a post exactly as supplied.
    ///
    /// The author id is taken from the draft and not checked against any
    /// session or user record.
    pub async fn create_post(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let text = draft
            .text
            .ok_or_else(|| DomainError::Validation("text is required".to_string()))?;
        let user_id = draft
            .user_id
            .ok_or_else(|| DomainError::Validation("user_id is required".to_string()))?;

        let post = self.posts.insert(NewPost::new(text, user_id)).await?;
        tracing::info!(post_id = post.id, user_id = post.user_id, "Post created");
        Ok(post)
    }

    /// Every post, oldest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list().await?)
    }

    pub async fn reset(&self) -> Result<(), DomainError> {
        Ok(self.posts.reset().await?)
    }
}
