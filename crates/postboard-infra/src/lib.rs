//! # Postboard Infrastructure
//!
//! Concrete implementations of the ports defined in `postboard-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL user/post storage via SeaORM
//! - `redis` - Redis session store

pub mod auth;
pub mod database;
pub mod session;

// Re-exports - In-Memory
pub use auth::Argon2PasswordService;
pub use database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
pub use session::InMemorySessionStore;

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
pub use session::{RedisConfig, RedisSessionStore};
