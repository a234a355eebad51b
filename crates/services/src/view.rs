//! Presentation contract: everything a renderer needs to draw the curriculum
//! graph, with no layout or styling decisions baked in.

use serde::{Deserialize, Serialize};

use plan_core::catalog::Catalog;
use plan_core::model::{CourseId, ProgressRecord};
use plan_core::stats::AcademicStatistics;
use plan_core::{DerivedState, compute_statistics, derive_states};
use std::collections::HashMap;

/// One course node, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseNode {
    pub id: CourseId,
    pub name: String,
    pub level: u8,
    pub state: DerivedState,
    /// Final grade of a passed course; `None` otherwise.
    pub displayed_grade: Option<f64>,
    /// Failed-attempt grades shown as badges, in attempt order.
    pub retake_badges: Vec<f64>,
}

/// A directed enrollment-prerequisite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumEdge {
    pub source: CourseId,
    pub target: CourseId,
    /// Highlighted when the edge leads into a course that just became
    /// available.
    pub active: bool,
}

/// The whole curriculum as derived for one user: nodes in plan order, one
/// edge per enrollment prerequisite, and the statistics header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumView {
    pub nodes: Vec<CourseNode>,
    pub edges: Vec<CurriculumEdge>,
    pub stats: AcademicStatistics,
}

impl CurriculumView {
    /// Assembles the view from the catalog and the user's current records.
    #[must_use]
    pub fn build(catalog: &Catalog, records: &HashMap<CourseId, ProgressRecord>) -> Self {
        let states = derive_states(catalog, records);
        let stats = compute_statistics(records.values());

        let mut nodes = Vec::with_capacity(catalog.len());
        let mut edges = Vec::new();

        for course in catalog.courses() {
            let record = records.get(&course.id);
            let state = states[&course.id];

            nodes.push(CourseNode {
                id: course.id,
                name: course.name.clone(),
                level: course.level,
                state,
                displayed_grade: record.and_then(ProgressRecord::displayed_grade),
                retake_badges: record.map(ProgressRecord::retake_badges).unwrap_or_default(),
            });

            for prereq in &course.enrollment_prereqs {
                edges.push(CurriculumEdge {
                    source: *prereq,
                    target: course.id,
                    active: state == DerivedState::Available,
                });
            }
        }

        Self { nodes, edges, stats }
    }

    #[must_use]
    pub fn node(&self, id: CourseId) -> Option<&CourseNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::catalog::systems_engineering_plan;
    use plan_core::model::{CourseState, ProgressDraft};
    use plan_core::time::fixed_now;

    fn records(entries: Vec<ProgressRecord>) -> HashMap<CourseId, ProgressRecord> {
        entries.into_iter().map(|r| (r.course_id, r)).collect()
    }

    #[test]
    fn nodes_follow_plan_order_and_cover_the_catalog() {
        let catalog = systems_engineering_plan();
        let view = CurriculumView::build(&catalog, &HashMap::new());
        assert_eq!(view.nodes.len(), catalog.len());
        assert_eq!(view.nodes[0].id, CourseId::new(1));
        assert_eq!(view.nodes.last().unwrap().id, CourseId::new(36));
    }

    #[test]
    fn one_edge_per_enrollment_prerequisite() {
        let catalog = systems_engineering_plan();
        let view = CurriculumView::build(&catalog, &HashMap::new());
        let expected: usize = catalog
            .courses()
            .iter()
            .map(|c| c.enrollment_prereqs.len())
            .sum();
        assert_eq!(view.edges.len(), expected);
    }

    #[test]
    fn passed_node_carries_grade_and_badges() {
        let catalog = systems_engineering_plan();
        let record = ProgressDraft::new(CourseId::new(1), CourseState::Passed)
            .with_final_grade(7.5)
            .with_retake(1, Some(3.0))
            .validate(fixed_now())
            .unwrap();
        let view = CurriculumView::build(&catalog, &records(vec![record]));

        let node = view.node(CourseId::new(1)).unwrap();
        assert_eq!(node.state, DerivedState::Passed);
        assert_eq!(node.displayed_grade, Some(7.5));
        assert_eq!(node.retake_badges, vec![3.0]);
        assert_eq!(view.stats.passed_count, 1);
    }

    #[test]
    fn edges_into_available_courses_are_active() {
        let catalog = systems_engineering_plan();
        let entries = records(vec![
            ProgressDraft::new(CourseId::new(1), CourseState::InProgress)
                .validate(fixed_now())
                .unwrap(),
            ProgressDraft::new(CourseId::new(2), CourseState::InProgress)
                .validate(fixed_now())
                .unwrap(),
        ]);
        let view = CurriculumView::build(&catalog, &entries);

        // Análisis Matemático 2 (9) becomes available once 1 and 2 are taken.
        let into_nine: Vec<_> = view
            .edges
            .iter()
            .filter(|e| e.target == CourseId::new(9))
            .collect();
        assert_eq!(into_nine.len(), 2);
        assert!(into_nine.iter().all(|e| e.active));

        // Probabilidades (17) also unlocks from 1 and 2; Bases de Datos (19)
        // stays locked, so its incoming edges stay inactive.
        assert!(
            view.edges
                .iter()
                .filter(|e| e.target == CourseId::new(19))
                .all(|e| !e.active)
        );
    }

    #[test]
    fn view_serializes_to_json() {
        let catalog = systems_engineering_plan();
        let view = CurriculumView::build(&catalog, &HashMap::new());
        let json = serde_json::to_string(&view).unwrap();
        let parsed: CurriculumView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, view);
    }
}
