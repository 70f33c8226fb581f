//! Credential store - user records, email uniqueness and password checks.

use std::sync::{Arc, OnceLock};

use crate::domain::{NewUser, User, UserId, mask_email};
use crate::error::RepoError;
use crate::ports::{AuthError, PasswordService, UserRepository};

/// Verified against when the email is unknown, so both login failure paths
/// pay for one hash verification.
const DUMMY_PASSWORD: &str = "postboard-dummy-password";

pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    dummy_hash: OnceLock<String>,
}

impl CredentialStore {
    /// Hashes the dummy password up front so the first unknown-email login
    /// costs the same as every later one.
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        let dummy_hash = OnceLock::new();
        match passwords.hash(DUMMY_PASSWORD) {
            Ok(hash) => {
                let _ = dummy_hash.set(hash);
            }
            Err(e) => tracing::warn!(error = %e, "Dummy hash unavailable, will retry on first use"),
        }

        Self {
            users,
            passwords,
            dummy_hash,
        }
    }

    /// Create a user with a hashed password.
    ///
    /// Fails with [`AuthError::InvalidCredentials`] when the password is
    /// absent and [`AuthError::DuplicateEmail`] when the email is taken.
    pub async fn create_user(&self, email: &str, password: Option<&str>) -> Result<User, AuthError> {
        let password = password
            .ok_or_else(|| AuthError::InvalidCredentials("password is required".to_string()))?;

        let password_hash = self.passwords.hash(password)?;

        match self.users.insert(NewUser::new(email, password_hash)).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, email = %mask_email(email), "User created");
                Ok(user)
            }
            Err(RepoError::Constraint(_)) => {
                tracing::debug!(email = %mask_email(email), "Signup rejected, email taken");
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `password` is the one registered for `email`.
    ///
    /// Unknown emails and wrong passwords both answer `false`.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        Ok(self.authenticate(email, password).await?.is_some())
    }

    /// The user owning these credentials, if they match.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        match self.users.find_by_email(email).await? {
            Some(user) => {
                if self.passwords.verify(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => {
                self.verify_against_dummy(password)?;
                Ok(None)
            }
        }
    }

    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn reset(&self) -> Result<(), AuthError> {
        Ok(self.users.reset().await?)
    }

    fn verify_against_dummy(&self, password: &str) -> Result<(), AuthError> {
        let hash = match self.dummy_hash.get() {
            Some(hash) => hash,
            None => {
                let hash = self.passwords.hash(DUMMY_PASSWORD)?;
                self.dummy_hash.get_or_init(|| hash)
            }
        };
        self.passwords.verify(password, hash)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{CountingPasswords, FakeUsers, PlainPasswords};

    fn store() -> (CredentialStore, Arc<FakeUsers>) {
        let users = Arc::new(FakeUsers::default());
        (
            CredentialStore::new(users.clone(), Arc::new(PlainPasswords)),
            users,
        )
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let (store, _) = store();
        let user = store.create_user("a@b.com", Some("hunter2")).await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_ne!(user.password_hash, "hunter2");
    }

    #[tokio::test]
    async fn test_create_user_without_password_is_invalid() {
        let (store, users) = store();
        let result = store.create_user("a@b.com", None).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
        assert_eq!(users.count_with_email("a@b.com"), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (store, users) = store();
        store.create_user("a@b.com", Some("one")).await.unwrap();
        let result = store.create_user("a@b.com", Some("two")).await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
        assert_eq!(users.count_with_email("a@b.com"), 1);
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let (store, _) = store();
        store.create_user("a@b.com", Some("right")).await.unwrap();
        assert!(store.verify_credentials("a@b.com", "right").await.unwrap());
        assert!(!store.verify_credentials("a@b.com", "wrong").await.unwrap());
        assert!(!store.verify_credentials("nobody@b.com", "right").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_email_costs_one_verification_from_the_start() {
        let passwords = Arc::new(CountingPasswords::default());
        let store = CredentialStore::new(Arc::new(FakeUsers::default()), passwords.clone());
        store.create_user("a@b.com", Some("right")).await.unwrap();
        let hashes_before = passwords.hashes();

        assert!(!store.verify_credentials("nobody@b.com", "right").await.unwrap());
        assert_eq!(passwords.hashes(), hashes_before);
        assert_eq!(passwords.verifies(), 1);

        assert!(!store.verify_credentials("a@b.com", "wrong").await.unwrap());
        assert_eq!(passwords.hashes(), hashes_before);
        assert_eq!(passwords.verifies(), 2);
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let (store, _) = store();
        store.create_user("a@b.com", Some("pw")).await.unwrap();
        assert!(!store.verify_credentials("A@B.COM", "pw").await.unwrap());
    }
}
