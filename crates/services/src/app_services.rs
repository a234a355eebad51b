use std::sync::Arc;

use plan_core::catalog::{Catalog, systems_engineering_plan};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::login_service::LoginService;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over a shared catalog and storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    login: Arc<LoginService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, catalog: Catalog, storage: &Storage) -> Self {
        let catalog = Arc::new(catalog);
        let login = Arc::new(LoginService::new(clock, Arc::clone(&storage.users)));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
        ));
        Self {
            catalog,
            login,
            progress,
        }
    }

    /// Build services backed by `SQLite` storage and the shipped study plan.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(clock, systems_engineering_plan(), &storage))
    }

    /// In-memory services for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, systems_engineering_plan(), &Storage::in_memory())
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn login(&self) -> Arc<LoginService> {
        Arc::clone(&self.login)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
