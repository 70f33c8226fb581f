//! Services - the authentication state machine and the post feed, written
//! against the ports only.

mod auth;
mod credentials;
mod posts;
mod session;

#[cfg(test)]
pub(crate) mod fakes;

pub use auth::{AuthService, LoginSuccess};
pub use credentials::CredentialStore;
pub use posts::PostService;
pub use session::SessionManager;
