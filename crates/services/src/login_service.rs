use std::sync::Arc;

use plan_core::model::User;
use storage::repository::{StorageError, UserRepository};

use crate::Clock;
use crate::error::LoginError;

/// Email-keyed lookup-or-create login.
///
/// There is no password and no expiry; the returned user's id is the session
/// token the caller passes to every subsequent operation.
#[derive(Clone)]
pub struct LoginService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
}

impl LoginService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, users }
    }

    /// Resolve an email to a user, creating the account on first login.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::InvalidEmail` for an empty email and
    /// `LoginError::Storage` on repository failures.
    pub async fn login(&self, email: &str) -> Result<User, LoginError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginError::InvalidEmail);
        }

        if let Some(user) = self.users.find_by_email(email).await? {
            return Ok(user);
        }

        let user = User::new(email, self.clock.now());
        match self.users.insert_user(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, email, "created user on first login");
                Ok(user)
            }
            // Lost a create race with another session; the lookup now succeeds.
            Err(StorageError::Conflict) => {
                let existing = self.users.find_by_email(email).await?;
                existing.ok_or(LoginError::Storage(StorageError::NotFound))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service() -> LoginService {
        LoginService::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn first_login_creates_the_user() {
        let service = service();
        let user = service.login("ada@example.edu").await.unwrap();
        assert_eq!(user.email, "ada@example.edu");
        assert_eq!(user.name, "ada");
    }

    #[tokio::test]
    async fn second_login_returns_the_same_user() {
        let service = service();
        let first = service.login("ada@example.edu").await.unwrap();
        let second = service.login("ada@example.edu").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn empty_email_is_rejected() {
        let service = service();
        assert!(matches!(
            service.login("   ").await.unwrap_err(),
            LoginError::InvalidEmail
        ));
    }

    #[tokio::test]
    async fn email_is_trimmed_before_lookup() {
        let service = service();
        let first = service.login("ada@example.edu").await.unwrap();
        let second = service.login("  ada@example.edu  ").await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
