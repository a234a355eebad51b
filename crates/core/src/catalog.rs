//! The study plan: a fixed, validated set of courses.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Course, CourseId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate course id {0}")]
    DuplicateCourse(CourseId),

    #[error("course {course} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        course: CourseId,
        prerequisite: CourseId,
    },

    #[error("course {0} lists itself as a prerequisite")]
    SelfPrerequisite(CourseId),
}

/// Immutable course catalog with an id index.
///
/// Construction validates referential integrity so state derivation can be
/// total: every prerequisite id resolves to a course in the catalog. The
/// prerequisite graph is expected to be acyclic; the shipped plan is.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    by_id: HashMap<CourseId, usize>,
}

impl Catalog {
    /// Builds a catalog from a course list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids, self-references, or
    /// prerequisite ids with no matching course.
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(courses.len());
        for (index, course) in courses.iter().enumerate() {
            if by_id.insert(course.id, index).is_some() {
                return Err(CatalogError::DuplicateCourse(course.id));
            }
        }

        for course in &courses {
            for prereq in course
                .enrollment_prereqs
                .iter()
                .chain(course.completion_prereqs.iter())
            {
                if *prereq == course.id {
                    return Err(CatalogError::SelfPrerequisite(course.id));
                }
                if !by_id.contains_key(prereq) {
                    return Err(CatalogError::UnknownPrerequisite {
                        course: course.id,
                        prerequisite: *prereq,
                    });
                }
            }
        }

        Ok(Self { courses, by_id })
    }

    #[must_use]
    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.by_id.get(&id).map(|index| &self.courses[*index])
    }

    #[must_use]
    pub fn contains(&self, id: CourseId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Courses in plan order (by level, then id).
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// The Information Systems Engineering study plan: 36 courses over 5 levels.
///
/// # Panics
///
/// Panics if the embedded plan data is inconsistent, which is covered by
/// tests and cannot happen at runtime.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn systems_engineering_plan() -> Catalog {
    let courses = vec![
        // ── Level 1 ──
        Course::new(1, 1, "Análisis Matemático 1", &[], &[]),
        Course::new(2, 1, "Álgebra y Geometría Analítica", &[], &[]),
        Course::new(3, 1, "Física 1", &[], &[]),
        Course::new(4, 1, "Inglés 1", &[], &[]),
        Course::new(5, 1, "Lógica y Estructuras Discretas", &[], &[]),
        Course::new(6, 1, "Algoritmos y Estructuras de Datos", &[], &[]),
        Course::new(7, 1, "Arquitectura de Computadoras", &[], &[]),
        Course::new(8, 1, "Sistemas y Procesos de Negocio", &[], &[]),
        // ── Level 2 ──
        Course::new(9, 2, "Análisis Matemático 2", &[1, 2], &[]),
        Course::new(10, 2, "Física 2", &[1, 3], &[]),
        Course::new(11, 2, "Ingeniería y Sociedad", &[], &[]),
        Course::new(12, 2, "Inglés 2", &[], &[]),
        Course::new(13, 2, "Sintaxis y Semántica de los Lenguajes", &[5, 6], &[]),
        Course::new(14, 2, "Paradigmas de Programación", &[5, 6], &[]),
        Course::new(15, 2, "Sistemas Operativos", &[7], &[]),
        Course::new(16, 2, "Análisis de Sistemas de Información (Int.)", &[6, 8], &[]),
        // ── Level 3 ──
        Course::new(17, 3, "Probabilidades y Estadísticas", &[1, 2], &[]),
        Course::new(18, 3, "Economía", &[], &[1, 2]),
        Course::new(19, 3, "Bases de Datos", &[13, 16], &[5, 6]),
        Course::new(20, 3, "Desarrollo de Software", &[14, 16], &[5, 6]),
        Course::new(21, 3, "Comunicación de Datos", &[], &[3, 7]),
        Course::new(22, 3, "Análisis Numérico", &[9], &[1, 2]),
        Course::new(23, 3, "Diseño de Sistemas de Información (Int.)", &[14, 16], &[4, 6, 8]),
        // ── Level 4 ──
        Course::new(24, 4, "Legislación", &[11], &[]),
        Course::new(25, 4, "Ingeniería y Calidad de Software", &[19, 20, 23], &[13, 14]),
        Course::new(26, 4, "Redes de Datos", &[15, 21], &[]),
        Course::new(27, 4, "Investigación Operativa", &[17, 22], &[]),
        Course::new(28, 4, "Simulación", &[17], &[9]),
        Course::new(29, 4, "Tecnologías para la automatización", &[10, 22], &[9]),
        Course::new(30, 4, "Adm. Sistemas Información (Int.)", &[18, 23], &[16]),
        // ── Level 5 ──
        Course::new(31, 5, "Inteligencia Artificial", &[28], &[17, 22]),
        Course::new(32, 5, "Ciencia de Datos", &[28], &[17, 19]),
        Course::new(33, 5, "Sistemas de Gestión", &[18, 27], &[23]),
        Course::new(34, 5, "Gestión Gerencial", &[24, 30], &[18]),
        Course::new(35, 5, "Seguridad en los Sistemas de Información", &[26, 30], &[20, 21]),
        Course::new(36, 5, "Proyecto Final (integrador)", &[25, 26, 30], &[12, 20, 23]),
    ];

    Catalog::new(courses).expect("embedded study plan should be consistent")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
