use async_trait::async_trait;
use plan_core::model::{CourseId, ProgressRecord, UserId};

use super::SqliteRepository;
use super::mapping::{map_progress_row, state_to_str};
use crate::repository::{ProgressRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    course_id, state, final_grade, retake_count,
                    retake_grade_1, retake_grade_2, retake_grade_3, updated_at
                FROM course_progress
                WHERE user_id = ?1
                ORDER BY course_id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_progress_row).collect()
    }

    async fn upsert(&self, user_id: UserId, record: &ProgressRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO course_progress (
                    user_id, course_id, state, final_grade, retake_count,
                    retake_grade_1, retake_grade_2, retake_grade_3, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT (user_id, course_id) DO UPDATE SET
                    state = excluded.state,
                    final_grade = excluded.final_grade,
                    retake_count = excluded.retake_count,
                    retake_grade_1 = excluded.retake_grade_1,
                    retake_grade_2 = excluded.retake_grade_2,
                    retake_grade_3 = excluded.retake_grade_3,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(record.course_id.value()))
        .bind(state_to_str(record.state))
        .bind(record.final_grade)
        .bind(i64::from(record.retake_count))
        .bind(record.retake_grades[0])
        .bind(record.retake_grades[1])
        .bind(record.retake_grades[2])
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_one(&self, user_id: UserId, course_id: CourseId) -> Result<(), StorageError> {
        // Missing rows delete zero rows; that is the contract, not an error.
        sqlx::query("DELETE FROM course_progress WHERE user_id = ?1 AND course_id = ?2")
            .bind(user_id.to_string())
            .bind(i64::from(course_id.value()))
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        Ok(())
    }
}
