use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Identifier assigned to a post at creation, in insertion order.
pub type PostId = i64;

/// Post entity - a short text attributed to a user.
///
/// `user_id` is whatever the author claimed at creation; it is not checked
/// against the session or the users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A validated post that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(text: impl Into<String>, user_id: UserId) -> Self {
        Self {
            text: text.into(),
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Attach the id assigned by the store.
    pub fn with_id(self, id: PostId) -> Post {
        Post {
            id,
            text: self.text,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

/// Caller-supplied post fields before validation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub text: Option<String>,
    pub user_id: Option<UserId>,
}
