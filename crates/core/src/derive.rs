//! Display-state derivation over the catalog and a student's records.
//!
//! Derived states are never persisted; they are recomputed from the current
//! record set on every read.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::{CourseId, CourseState, ProgressRecord};

/// Four-way display state of a course node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedState {
    /// No record and at least one enrollment prerequisite not yet taken.
    Locked,
    /// No record and every enrollment prerequisite has been taken.
    Available,
    /// A record exists with state `InProgress`.
    InProgress,
    /// A record exists with state `Passed`. Never re-locked.
    Passed,
}

/// Derives the display state of every course in the catalog.
///
/// Pure and total: each course is decided independently from its own record
/// and the mere existence of records for its enrollment prerequisites.
/// "Taken" is sufficient to unlock a dependent course; passing is not
/// required. Completion prerequisites do not participate here.
#[must_use]
pub fn derive_states(
    catalog: &Catalog,
    records: &HashMap<CourseId, ProgressRecord>,
) -> BTreeMap<CourseId, DerivedState> {
    catalog
        .courses()
        .iter()
        .map(|course| {
            let state = match records.get(&course.id).map(|r| r.state) {
                Some(CourseState::Passed) => DerivedState::Passed,
                Some(CourseState::InProgress) => DerivedState::InProgress,
                None => {
                    let unlocked = course
                        .enrollment_prereqs
                        .iter()
                        .all(|id| records.contains_key(id));
                    if unlocked {
                        DerivedState::Available
                    } else {
                        DerivedState::Locked
                    }
                }
            };
            (course.id, state)
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
