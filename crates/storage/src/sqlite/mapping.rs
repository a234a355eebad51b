use plan_core::model::{CourseId, CourseState, ProgressRecord, User, UserId};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    u32::try_from(v)
        .map(CourseId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid course_id: {v}")))
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>()
        .map_err(|_| StorageError::Serialization(format!("invalid user_id: {s}")))
}

/// Converts a `CourseState` to its storage representation.
/// This must stay consistent with `state_from_str`.
pub(crate) fn state_to_str(state: CourseState) -> &'static str {
    match state {
        CourseState::InProgress => "in_progress",
        CourseState::Passed => "passed",
    }
}

pub(crate) fn state_from_str(s: &str) -> Result<CourseState, StorageError> {
    match s {
        "in_progress" => Ok(CourseState::InProgress),
        "passed" => Ok(CourseState::Passed),
        other => Err(StorageError::Serialization(format!(
            "invalid state: {other}"
        ))),
    }
}

pub(crate) fn retake_count_from_i64(v: i64) -> Result<u8, StorageError> {
    match u8::try_from(v) {
        Ok(count) if count <= 3 => Ok(count),
        _ => Err(StorageError::Serialization(format!(
            "invalid retake_count: {v}"
        ))),
    }
}

pub(crate) fn map_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressRecord, StorageError> {
    let state_str: String = row.try_get("state").map_err(ser)?;

    Ok(ProgressRecord {
        course_id: course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?,
        state: state_from_str(state_str.as_str())?,
        final_grade: row.try_get("final_grade").map_err(ser)?,
        retake_count: retake_count_from_i64(row.try_get::<i64, _>("retake_count").map_err(ser)?)?,
        retake_grades: [
            row.try_get("retake_grade_1").map_err(ser)?,
            row.try_get("retake_grade_2").map_err(ser)?,
            row.try_get("retake_grade_3").map_err(ser)?,
        ],
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
    let id_str: String = row.try_get("id").map_err(ser)?;
    Ok(User {
        id: user_id_from_str(id_str.as_str())?,
        email: row.try_get("email").map_err(ser)?,
        name: row.try_get("name").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
