//! # Core Type Definitions
//!
//! This module contains all core types for the Gradebook registry:
//! - Records (`Person`, `Subject`, `Grade`)
//! - The `Record` trait used by `EntityStore`
//! - Entity classification (`EntityKind`)
//! - Error types (`GradebookError`)
//!
//! ## Identity
//!
//! Identifiers are plain `i64` values, unique within one collection only.
//! A student and a teacher may share an id. Grades carry no identifier of
//! their own and reference other records by id, never by pointer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Integer key unique within one entity collection.
pub type RecordId = i64;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// The four entity collections of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Student,
    Teacher,
    Subject,
    Grade,
}

impl EntityKind {
    /// Lowercase name, used in log fields and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Subject => "subject",
            Self::Grade => "grade",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A record addressable by an integer identifier.
pub trait Record {
    /// The identifier of this record within its collection.
    fn id(&self) -> RecordId;
}

// =============================================================================
// PERSON
// =============================================================================

/// A person registered as a student or as a teacher.
///
/// The same shape serves both roles; the collection it lives in decides
/// the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

impl Person {
    /// Create a new person.
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Record for Person {
    fn id(&self) -> RecordId {
        self.id
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// A subject grades are given in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: RecordId,
    pub name: String,
}

impl Subject {
    /// Create a new subject.
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Record for Subject {
    fn id(&self) -> RecordId {
        self.id
    }
}

// =============================================================================
// GRADE
// =============================================================================

/// A grade given by a teacher to a student in a subject.
///
/// Grades are append-only: once accepted they are never updated or removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub student_id: RecordId,
    pub teacher_id: RecordId,
    pub subject_id: RecordId,
    pub value: f64,
}

impl Grade {
    /// Create a new grade.
    #[must_use]
    pub const fn new(
        student_id: RecordId,
        teacher_id: RecordId,
        subject_id: RecordId,
        value: f64,
    ) -> Self {
        Self {
            student_id,
            teacher_id,
            subject_id,
            value,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors returned by registry operations.
///
/// - No silent failures
/// - Every variant carries the identifier that caused it
/// - Nothing here is transient, so nothing is retried
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradebookError {
    /// A record with the same id already exists in the collection.
    #[error("{kind} with id {id} already exists")]
    DuplicateId { kind: EntityKind, id: RecordId },

    /// No record with this id exists in the collection.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    /// A grade references a student that is not registered.
    #[error("student with id {0} does not exist")]
    MissingStudent(RecordId),

    /// A grade references a teacher that is not registered.
    #[error("teacher with id {0} does not exist")]
    MissingTeacher(RecordId),

    /// A grade references a subject that is not registered.
    #[error("subject with id {0} does not exist")]
    MissingSubject(RecordId),

    /// An average was requested for a student that is not registered.
    #[error("student with id {0} is not registered")]
    StudentNotFound(RecordId),

    /// An average was requested for a subject that is not registered.
    #[error("subject with id {0} is not registered")]
    SubjectNotFound(RecordId),

    /// The student has no grades in the subject, so there is nothing to average.
    #[error("no grades found for student {student_id} in subject {subject_id}")]
    NoGradesFound {
        student_id: RecordId,
        subject_id: RecordId,
    },

    /// An update carried a record whose id differs from the addressed id.
    #[error("{kind} update addressed id {path_id} but record carries id {record_id}")]
    IdMismatch {
        kind: EntityKind,
        path_id: RecordId,
        record_id: RecordId,
    },
}

impl GradebookError {
    /// Stable snake_case tag for the error variant.
    #[must_use]
    pub const fn kind_tag(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate_id",
            Self::NotFound { .. } => "not_found",
            Self::MissingStudent(_) => "missing_student",
            Self::MissingTeacher(_) => "missing_teacher",
            Self::MissingSubject(_) => "missing_subject",
            Self::StudentNotFound(_) => "student_not_found",
            Self::SubjectNotFound(_) => "subject_not_found",
            Self::NoGradesFound { .. } => "no_grades_found",
            Self::IdMismatch { .. } => "id_mismatch",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
