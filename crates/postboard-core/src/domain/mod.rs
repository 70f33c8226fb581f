//! Domain entities - the core business objects.

mod post;
mod session;
mod user;

pub use post::{NewPost, Post, PostDraft, PostId};
pub use session::{AuthState, SessionToken};
pub use user::{NewUser, User, UserId, mask_email};
