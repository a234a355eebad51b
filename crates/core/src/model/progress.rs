use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CourseId;

/// Maximum number of failed attempts that can be recorded per course.
pub const MAX_RETAKES: u8 = 3;
/// Inclusive bounds for a passing final grade.
pub const PASSING_GRADE_MIN: f64 = 6.0;
pub const PASSING_GRADE_MAX: f64 = 10.0;
/// Inclusive bounds for a failed-attempt grade.
pub const RETAKE_GRADE_MIN: f64 = 1.0;
pub const RETAKE_GRADE_MAX: f64 = 5.0;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("approval grade must be 6-10")]
    MissingFinalGrade,

    #[error("approval grade must be 6-10, got {0}")]
    FinalGradeOutOfRange(f64),

    #[error("retake count must be 0-3, got {0}")]
    TooManyRetakes(u8),

    #[error("retake {0} must be 1-5")]
    MissingRetakeGrade(u8),

    #[error("retake {attempt} must be 1-5, got {grade}")]
    RetakeGradeOutOfRange { attempt: u8, grade: f64 },
}

//
// ─── COURSE STATE ──────────────────────────────────────────────────────────────
//

/// Persisted state of a course the student has a record for.
///
/// Courses without a record have no persisted state; their display state is
/// derived from prerequisites instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    /// Enrolled and regularized, final exam still pending.
    InProgress,
    /// Final exam passed; a final grade is recorded.
    Passed,
}

//
// ─── PROGRESS DRAFT / RECORD ───────────────────────────────────────────────────
//

/// Unvalidated edit of a course's progress, as entered in the editing form.
///
/// A draft holds raw optional grades; `validate` turns it into a
/// `ProgressRecord` or rejects it with the first domain violation found.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDraft {
    pub course_id: CourseId,
    pub state: CourseState,
    pub final_grade: Option<f64>,
    pub retake_count: u8,
    pub retake_grades: [Option<f64>; MAX_RETAKES as usize],
}

impl ProgressDraft {
    #[must_use]
    pub fn new(course_id: CourseId, state: CourseState) -> Self {
        Self {
            course_id,
            state,
            final_grade: None,
            retake_count: 0,
            retake_grades: [None; MAX_RETAKES as usize],
        }
    }

    #[must_use]
    pub fn with_final_grade(mut self, grade: f64) -> Self {
        self.final_grade = Some(grade);
        self
    }

    #[must_use]
    pub fn with_retake(mut self, attempt: u8, grade: Option<f64>) -> Self {
        if (1..=MAX_RETAKES).contains(&attempt) {
            self.retake_count = self.retake_count.max(attempt);
            self.retake_grades[usize::from(attempt) - 1] = grade;
        }
        self
    }

    /// Validates the draft against the grading rules and stamps it.
    ///
    /// Checks run in form order and stop at the first violation:
    /// passing grade in 6-10 when the state is `Passed`, then each retake
    /// grade up to `retake_count` in 1-5. Retake slots past `retake_count`
    /// are cleared rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns the first `ProgressError` violated by the draft.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ProgressRecord, ProgressError> {
        if self.state == CourseState::Passed {
            let grade = self.final_grade.ok_or(ProgressError::MissingFinalGrade)?;
            if !(PASSING_GRADE_MIN..=PASSING_GRADE_MAX).contains(&grade) {
                return Err(ProgressError::FinalGradeOutOfRange(grade));
            }
        }

        if self.retake_count > MAX_RETAKES {
            return Err(ProgressError::TooManyRetakes(self.retake_count));
        }

        let mut retake_grades = [None; MAX_RETAKES as usize];
        for attempt in 1..=self.retake_count {
            let slot = usize::from(attempt) - 1;
            let grade = self.retake_grades[slot]
                .ok_or(ProgressError::MissingRetakeGrade(attempt))?;
            if !(RETAKE_GRADE_MIN..=RETAKE_GRADE_MAX).contains(&grade) {
                return Err(ProgressError::RetakeGradeOutOfRange { attempt, grade });
            }
            retake_grades[slot] = Some(grade);
        }

        Ok(ProgressRecord {
            course_id: self.course_id,
            state: self.state,
            final_grade: self.final_grade,
            retake_count: self.retake_count,
            retake_grades,
            updated_at: now,
        })
    }
}

/// Validated progress for one (user, course) pair.
///
/// Fully replaced on every save; the retake grade at index `i` is present
/// iff `i < retake_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub course_id: CourseId,
    pub state: CourseState,
    pub final_grade: Option<f64>,
    pub retake_count: u8,
    pub retake_grades: [Option<f64>; MAX_RETAKES as usize],
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Grade shown on the course node: the final grade of a passed course.
    #[must_use]
    pub fn displayed_grade(&self) -> Option<f64> {
        match self.state {
            CourseState::Passed => self.final_grade,
            CourseState::InProgress => None,
        }
    }

    /// Recorded failed-attempt grades, in attempt order.
    #[must_use]
    pub fn retake_badges(&self) -> Vec<f64> {
        self.retake_grades.iter().filter_map(|g| *g).collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
