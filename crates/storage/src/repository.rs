use async_trait::async_trait;
use plan_core::model::{CourseId, ProgressRecord, User, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-user course progress.
///
/// Records are keyed by `(user, course)`; the repository is the sole writer.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch every record the user has.
    ///
    /// Returns an empty vector, not an error, for users without records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Replace the record for `(user, record.course_id)` in full, creating it
    /// if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert(&self, user_id: UserId, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Remove the record for `(user, course)`. A missing record is a no-op,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn delete_one(&self, user_id: UserId, course_id: CourseId) -> Result<(), StorageError>;
}

/// Repository contract for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look a user up by email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    progress: Arc<Mutex<HashMap<(UserId, CourseId), ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut records: Vec<ProgressRecord> = guard
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by_key(|r| r.course_id);
        Ok(records)
    }

    async fn upsert(&self, user_id: UserId, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((user_id, record.course_id), record.clone());
        Ok(())
    }

    async fn delete_one(&self, user_id: UserId, course_id: CourseId) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&(user_id, course_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.values().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict);
        }
        guard.insert(user.id, user.clone());
        Ok(())
    }
}

/// Aggregates user and progress repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { users, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::model::{CourseState, ProgressDraft};
    use plan_core::time::fixed_now;

    fn build_record(course: u32) -> ProgressRecord {
        ProgressDraft::new(CourseId::new(course), CourseState::InProgress)
            .validate(fixed_now())
            .unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_record_in_full() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();

        let first = build_record(1);
        repo.upsert(user, &first).await.unwrap();

        let second = ProgressDraft::new(CourseId::new(1), CourseState::Passed)
            .with_final_grade(8.0)
            .validate(fixed_now())
            .unwrap();
        repo.upsert(user, &second).await.unwrap();

        let records = repo.list_by_user(user).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, CourseState::Passed);
        assert_eq!(records[0].final_grade, Some(8.0));
    }

    #[tokio::test]
    async fn list_is_empty_for_unknown_user() {
        let repo = InMemoryRepository::new();
        let records = repo.list_by_user(UserId::generate()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_record_is_a_noop() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        repo.upsert(user, &build_record(1)).await.unwrap();

        repo.delete_one(user, CourseId::new(2)).await.unwrap();

        let records = repo.list_by_user(user).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn records_are_isolated_per_user() {
        let repo = InMemoryRepository::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        repo.upsert(alice, &build_record(1)).await.unwrap();

        assert!(repo.list_by_user(bob).await.unwrap().is_empty());
        repo.delete_one(bob, CourseId::new(1)).await.unwrap();
        assert_eq!(repo.list_by_user(alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryRepository::new();
        let user = User::new("ada@example.edu", fixed_now());
        repo.insert_user(&user).await.unwrap();

        let again = User::new("ada@example.edu", fixed_now());
        let err = repo.insert_user(&again).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let found = repo.find_by_email("ada@example.edu").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }
}
