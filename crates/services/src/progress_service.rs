use std::collections::HashMap;
use std::sync::Arc;

use plan_core::catalog::Catalog;
use plan_core::model::{CourseId, ProgressDraft, ProgressRecord, UserId};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::ProgressServiceError;
use crate::view::CurriculumView;

/// Orchestrates reads and writes of a user's course progress.
///
/// The write path validates before persisting and returns only after the
/// store acknowledges; callers render from the returned record rather than
/// applying the edit optimistically.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetch the user's records keyed by course.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn record_map(
        &self,
        user_id: UserId,
    ) -> Result<HashMap<CourseId, ProgressRecord>, ProgressServiceError> {
        let records = self.progress.list_by_user(user_id).await?;
        Ok(records.into_iter().map(|r| (r.course_id, r)).collect())
    }

    /// Validate an edit and persist it, replacing any existing record for the
    /// course.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCourse` for ids outside the catalog, `Progress` for
    /// grade violations (nothing is persisted), and `Storage` if the upsert
    /// fails.
    pub async fn save(
        &self,
        user_id: UserId,
        draft: ProgressDraft,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        if !self.catalog.contains(draft.course_id) {
            return Err(ProgressServiceError::UnknownCourse(draft.course_id));
        }

        let record = draft.validate(self.clock.now())?;
        self.progress.upsert(user_id, &record).await?;
        tracing::info!(
            user_id = %user_id,
            course_id = %record.course_id,
            state = ?record.state,
            "saved course progress"
        );
        Ok(record)
    }

    /// Remove the user's record for a course. Missing records are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCourse` for ids outside the catalog and `Storage` if
    /// the delete fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<(), ProgressServiceError> {
        if !self.catalog.contains(course_id) {
            return Err(ProgressServiceError::UnknownCourse(course_id));
        }

        self.progress.delete_one(user_id, course_id).await?;
        tracing::info!(user_id = %user_id, course_id = %course_id, "deleted course progress");
        Ok(())
    }

    /// Assemble the full curriculum view for the user: derived states,
    /// edges, and statistics.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn curriculum_view(
        &self,
        user_id: UserId,
    ) -> Result<CurriculumView, ProgressServiceError> {
        let records = self.record_map(user_id).await?;
        Ok(CurriculumView::build(&self.catalog, &records))
    }
}
