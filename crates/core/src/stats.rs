//! Aggregate academic statistics over a student's progress records.

use serde::{Deserialize, Serialize};

use crate::model::{CourseState, ProgressDraft, ProgressRecord};

/// Statistics shown in the header: weighted across every exam attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcademicStatistics {
    /// Mean of all attempt grades, rounded to 2 decimals; 0.00 without attempts.
    pub average_grade: f64,
    pub passed_count: u32,
    pub total_retakes: u32,
}

impl Default for AcademicStatistics {
    fn default() -> Self {
        Self {
            average_grade: 0.0,
            passed_count: 0,
            total_retakes: 0,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the statistics triple from a record set.
///
/// An "attempt grade" is the final grade of a passed course (when positive)
/// plus every recorded positive retake grade, even on courses still in
/// progress. `total_retakes` sums the `retake_count` fields, which may
/// diverge from the number of recorded retake grades on inconsistent data.
pub fn compute_statistics<'a, I>(records: I) -> AcademicStatistics
where
    I: IntoIterator<Item = &'a ProgressRecord>,
{
    let mut sum = 0.0;
    let mut attempts = 0u32;
    let mut passed_count = 0u32;
    let mut total_retakes = 0u32;

    for record in records {
        if record.state == CourseState::Passed {
            passed_count += 1;
            if let Some(grade) = record.final_grade.filter(|g| *g > 0.0) {
                sum += grade;
                attempts += 1;
            }
        }
        for grade in record.retake_grades.iter().filter_map(|g| *g) {
            if grade > 0.0 {
                sum += grade;
                attempts += 1;
            }
        }
        total_retakes += u32::from(record.retake_count);
    }

    let average_grade = if attempts > 0 {
        round2(sum / f64::from(attempts))
    } else {
        0.0
    };

    AcademicStatistics {
        average_grade,
        passed_count,
        total_retakes,
    }
}

/// Live average over the grades currently entered in an edit form.
///
/// Counts the final grade only when the draft state is `Passed`, and retake
/// grades only up to the draft's retake count. `None` when no grade is
/// entered yet.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn attempt_average(draft: &ProgressDraft) -> Option<f64> {
    let mut grades = Vec::new();
    if draft.state == CourseState::Passed {
        if let Some(grade) = draft.final_grade {
            grades.push(grade);
        }
    }
    for attempt in 1..=draft.retake_count {
        if let Some(grade) = draft.retake_grades[usize::from(attempt) - 1] {
            grades.push(grade);
        }
    }

    if grades.is_empty() {
        return None;
    }
    Some(round2(grades.iter().sum::<f64>() / grades.len() as f64))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
