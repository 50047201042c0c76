//! # Roster Format
//!
//! A single document holding all four collections, used to seed a registry
//! and to export one. Every section is optional when deserializing.
//!
//! ```json
//! {
//!   "students": [{"id": 1, "name": "Ana", "email": "ana@example.com"}],
//!   "teachers": [{"id": 1, "name": "Luis", "email": "luis@example.com"}],
//!   "subjects": [{"id": 1, "name": "Math"}],
//!   "grades":   [{"student_id": 1, "teacher_id": 1, "subject_id": 1, "value": 4.5}]
//! }
//! ```

use crate::types::{Grade, Person, Subject};
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a registry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub students: Vec<Person>,
    pub teachers: Vec<Person>,
    pub subjects: Vec<Subject>,
    pub grades: Vec<Grade>,
}

impl Roster {
    /// Total number of records across all sections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.students.len() + self.teachers.len() + self.subjects.len() + self.grades.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let roster: Roster =
            serde_json::from_str(r#"{"subjects":[{"id":1,"name":"Math"}]}"#).expect("parse");
        assert!(roster.students.is_empty());
        assert!(roster.grades.is_empty());
        assert_eq!(roster.subjects, vec![Subject::new(1, "Math")]);
        assert_eq!(roster.record_count(), 1);
    }

    #[test]
    fn grade_with_missing_field_rejected() {
        let result: Result<Roster, _> =
            serde_json::from_str(r#"{"grades":[{"student_id":1,"teacher_id":1,"value":2.0}]}"#);
        assert!(result.is_err());
    }
}
