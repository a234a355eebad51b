use serde::{Deserialize, Serialize};

use crate::model::ids::CourseId;

/// A course in the study plan, immutable after catalog construction.
///
/// A course carries two prerequisite sets with different strengths:
/// - `enrollment_prereqs`: courses that must have *any* progress record
///   ("taken") before this one becomes available;
/// - `completion_prereqs`: courses the academic rules require to be passed
///   for full completion. Kept in the model; not consulted by derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Cohort year within the plan (1-based).
    pub level: u8,
    pub name: String,
    pub enrollment_prereqs: Vec<CourseId>,
    pub completion_prereqs: Vec<CourseId>,
}

impl Course {
    #[must_use]
    pub fn new(
        id: u32,
        level: u8,
        name: impl Into<String>,
        enrollment_prereqs: &[u32],
        completion_prereqs: &[u32],
    ) -> Self {
        Self {
            id: CourseId::new(id),
            level,
            name: name.into(),
            enrollment_prereqs: enrollment_prereqs.iter().copied().map(CourseId::new).collect(),
            completion_prereqs: completion_prereqs.iter().copied().map(CourseId::new).collect(),
        }
    }

    /// True when the course has no enrollment prerequisites at all.
    #[must_use]
    pub fn is_entry_level(&self) -> bool {
        self.enrollment_prereqs.is_empty()
    }
}
