//! # Query/Aggregation Engine
//!
//! Read-only filters over the grade collection and the per-subject average.
//!
//! Filters preserve insertion order and never fail: a student without grades
//! yields an empty result. Averaging, on the other hand, refuses to divide by
//! zero and reports `NoGradesFound` instead.

use crate::store::EntityStore;
use crate::types::{Grade, GradebookError, Person, RecordId, Subject};
use serde::{Deserialize, Serialize};

/// The mean of a student's grades in one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeAverage {
    pub student_id: RecordId,
    pub subject_id: RecordId,
    pub average: f64,
    /// Number of grades the mean was computed from (always >= 1).
    pub count: usize,
}

/// All grades of a student, in insertion order.
pub fn grades_for_student(student_id: RecordId, grades: &EntityStore<Grade>) -> Vec<Grade> {
    grades_matching(Some(student_id), None, grades)
}

/// Grades filtered by student and/or subject. `None` matches anything.
pub fn grades_matching(
    student_id: Option<RecordId>,
    subject_id: Option<RecordId>,
    grades: &EntityStore<Grade>,
) -> Vec<Grade> {
    grades
        .list()
        .iter()
        .filter(|g| student_id.is_none_or(|id| g.student_id == id))
        .filter(|g| subject_id.is_none_or(|id| g.subject_id == id))
        .copied()
        .collect()
}

/// Average of a student's grades in a subject.
///
/// Fails with `StudentNotFound` / `SubjectNotFound` when either is not
/// registered (student checked first), and with `NoGradesFound` when the
/// student has no grades in the subject.
pub fn average_grade(
    student_id: RecordId,
    subject_id: RecordId,
    students: &EntityStore<Person>,
    subjects: &EntityStore<Subject>,
    grades: &EntityStore<Grade>,
) -> Result<GradeAverage, GradebookError> {
    if !students.contains(student_id) {
        return Err(GradebookError::StudentNotFound(student_id));
    }
    if !subjects.contains(subject_id) {
        return Err(GradebookError::SubjectNotFound(subject_id));
    }

    let matched = grades_matching(Some(student_id), Some(subject_id), grades);
    if matched.is_empty() {
        return Err(GradebookError::NoGradesFound {
            student_id,
            subject_id,
        });
    }

    // Running mean: every intermediate stays within the range of the inputs,
    // so finite grades never overflow to infinity.
    let mut average = 0.0;
    for (seen, grade) in matched.iter().enumerate() {
        let n = (seen + 1) as f64;
        average = average - average / n + grade.value / n;
    }
    Ok(GradeAverage {
        student_id,
        subject_id,
        average,
        count: matched.len(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
