//! # Postboard Core
//!
//! The domain layer of the Postboard service.
//! This crate contains the authentication state machine, the credential and
//! session rules, and the post feed, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{AuthService, CredentialStore, PostService, SessionManager};
