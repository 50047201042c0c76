//! # Integrity Checker
//!
//! Referential integrity for grades: a grade may only be accepted when the
//! student, teacher and subject it references are registered.
//!
//! References are checked in a fixed order (student, teacher, subject) and
//! the first missing one is reported. Missing references are not aggregated.

use crate::store::EntityStore;
use crate::types::{Grade, GradebookError, Person, Subject};

/// Confirm every reference of `candidate` exists.
pub fn validate_grade(
    candidate: &Grade,
    students: &EntityStore<Person>,
    teachers: &EntityStore<Person>,
    subjects: &EntityStore<Subject>,
) -> Result<(), GradebookError> {
    if !students.contains(candidate.student_id) {
        return Err(GradebookError::MissingStudent(candidate.student_id));
    }
    if !teachers.contains(candidate.teacher_id) {
        return Err(GradebookError::MissingTeacher(candidate.teacher_id));
    }
    if !subjects.contains(candidate.subject_id) {
        return Err(GradebookError::MissingSubject(candidate.subject_id));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
