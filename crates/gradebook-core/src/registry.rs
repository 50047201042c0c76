//! # Registry
//!
//! The CRUD façade over the four entity collections.
//!
//! The Registry owns one `EntityStore` per entity kind and enforces the
//! invariants the stores do not:
//! - `create_*` rejects an id already present in the target collection
//! - `update_*` / `delete_*` require the addressed id to exist
//! - `create_grade` runs the integrity checker before appending
//!
//! Every failing operation leaves all collections untouched.
//!
//! ## Update ids
//!
//! An update addresses a record by id and carries a full replacement record,
//! which has an id of its own. Under `IdPolicy::Strict` a mismatch fails with
//! `IdMismatch`. Under `IdPolicy::Lenient` the record may move to its new id,
//! unless another record of the collection already holds it (`DuplicateId`).

use crate::integrity::validate_grade;
use crate::query::{self, GradeAverage};
use crate::roster::Roster;
use crate::store::EntityStore;
use crate::types::{EntityKind, Grade, GradebookError, Person, Record, RecordId, Subject};
use serde::{Deserialize, Serialize};

/// How `update_*` treats a replacement record whose id differs from the
/// addressed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Accept the replacement as-is.
    #[default]
    Lenient,
    /// Reject the replacement with `IdMismatch`.
    Strict,
}

/// Number of records per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub students: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub grades: usize,
}

/// Students, teachers, subjects and grades held in memory.
#[derive(Debug, Clone)]
pub struct Registry {
    students: EntityStore<Person>,
    teachers: EntityStore<Person>,
    subjects: EntityStore<Subject>,
    grades: EntityStore<Grade>,
    id_policy: IdPolicy,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_id_policy(IdPolicy::default())
    }
}

impl Registry {
    /// Create an empty registry with the lenient id policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given id policy.
    #[must_use]
    pub const fn with_id_policy(id_policy: IdPolicy) -> Self {
        Self {
            students: EntityStore::new(EntityKind::Student),
            teachers: EntityStore::new(EntityKind::Teacher),
            subjects: EntityStore::new(EntityKind::Subject),
            grades: EntityStore::new(EntityKind::Grade),
            id_policy,
        }
    }

    /// Build a registry from a roster.
    ///
    /// Records go through the same operations as live requests, in the order
    /// students, teachers, subjects, grades. The first failure aborts the load.
    pub fn from_roster(roster: Roster, id_policy: IdPolicy) -> Result<Self, GradebookError> {
        let mut registry = Self::with_id_policy(id_policy);
        for student in roster.students {
            registry.create_student(student)?;
        }
        for teacher in roster.teachers {
            registry.create_teacher(teacher)?;
        }
        for subject in roster.subjects {
            registry.create_subject(subject)?;
        }
        for grade in roster.grades {
            registry.create_grade(grade)?;
        }
        Ok(registry)
    }

    /// Rebuild a registry from a snapshot taken with `to_roster`.
    ///
    /// Ids must still be unique per collection, but grades are restored as
    /// they were: a snapshot taken after deleting a graded student, teacher or
    /// subject holds grades whose references are gone, and those are kept.
    /// Use `orphaned_grades` to count them.
    pub fn restore(roster: Roster, id_policy: IdPolicy) -> Result<Self, GradebookError> {
        let mut registry = Self::with_id_policy(id_policy);
        for student in roster.students {
            registry.create_student(student)?;
        }
        for teacher in roster.teachers {
            registry.create_teacher(teacher)?;
        }
        for subject in roster.subjects {
            registry.create_subject(subject)?;
        }
        for grade in roster.grades {
            registry.grades.add(grade);
        }
        Ok(registry)
    }

    /// Number of grades whose student, teacher or subject is no longer registered.
    #[must_use]
    pub fn orphaned_grades(&self) -> usize {
        self.grades
            .list()
            .iter()
            .filter(|g| validate_grade(g, &self.students, &self.teachers, &self.subjects).is_err())
            .count()
    }

    /// Snapshot every collection into a roster.
    #[must_use]
    pub fn to_roster(&self) -> Roster {
        Roster {
            students: self.students.list().to_vec(),
            teachers: self.teachers.list().to_vec(),
            subjects: self.subjects.list().to_vec(),
            grades: self.grades.list().to_vec(),
        }
    }

    /// The id policy applied by updates.
    #[must_use]
    pub const fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Record counts for every collection.
    #[must_use]
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            students: self.students.len(),
            teachers: self.teachers.len(),
            subjects: self.subjects.len(),
            grades: self.grades.len(),
        }
    }

    // =========================================================================
    // STUDENTS
    // =========================================================================

    pub fn create_student(&mut self, student: Person) -> Result<Person, GradebookError> {
        create_in(&mut self.students, student)
    }

    #[must_use]
    pub fn list_students(&self) -> &[Person] {
        self.students.list()
    }

    pub fn update_student(
        &mut self,
        id: RecordId,
        student: Person,
    ) -> Result<Person, GradebookError> {
        update_in(&mut self.students, id, student, self.id_policy)
    }

    pub fn delete_student(&mut self, id: RecordId) -> Result<Person, GradebookError> {
        self.students.remove(id)
    }

    // =========================================================================
    // TEACHERS
    // =========================================================================

    pub fn create_teacher(&mut self, teacher: Person) -> Result<Person, GradebookError> {
        create_in(&mut self.teachers, teacher)
    }

    #[must_use]
    pub fn list_teachers(&self) -> &[Person] {
        self.teachers.list()
    }

    pub fn update_teacher(
        &mut self,
        id: RecordId,
        teacher: Person,
    ) -> Result<Person, GradebookError> {
        update_in(&mut self.teachers, id, teacher, self.id_policy)
    }

    pub fn delete_teacher(&mut self, id: RecordId) -> Result<Person, GradebookError> {
        self.teachers.remove(id)
    }

    // =========================================================================
    // SUBJECTS
    // =========================================================================

    pub fn create_subject(&mut self, subject: Subject) -> Result<Subject, GradebookError> {
        create_in(&mut self.subjects, subject)
    }

    #[must_use]
    pub fn list_subjects(&self) -> &[Subject] {
        self.subjects.list()
    }

    pub fn update_subject(
        &mut self,
        id: RecordId,
        subject: Subject,
    ) -> Result<Subject, GradebookError> {
        update_in(&mut self.subjects, id, subject, self.id_policy)
    }

    pub fn delete_subject(&mut self, id: RecordId) -> Result<Subject, GradebookError> {
        self.subjects.remove(id)
    }

    // =========================================================================
    // GRADES
    // =========================================================================

    /// Append a grade after checking its student, teacher and subject exist.
    pub fn create_grade(&mut self, grade: Grade) -> Result<Grade, GradebookError> {
        validate_grade(&grade, &self.students, &self.teachers, &self.subjects)?;
        self.grades.add(grade);
        Ok(grade)
    }

    /// Every grade, in insertion order.
    #[must_use]
    pub fn list_grades(&self) -> &[Grade] {
        self.grades.list()
    }

    /// Grades of one student. Unknown students yield an empty list.
    #[must_use]
    pub fn grades_for_student(&self, student_id: RecordId) -> Vec<Grade> {
        query::grades_for_student(student_id, &self.grades)
    }

    /// Grades filtered by student and/or subject.
    #[must_use]
    pub fn grades_matching(
        &self,
        student_id: Option<RecordId>,
        subject_id: Option<RecordId>,
    ) -> Vec<Grade> {
        query::grades_matching(student_id, subject_id, &self.grades)
    }

    /// Mean of a student's grades in a subject.
    pub fn average_grade(
        &self,
        student_id: RecordId,
        subject_id: RecordId,
    ) -> Result<GradeAverage, GradebookError> {
        query::average_grade(
            student_id,
            subject_id,
            &self.students,
            &self.subjects,
            &self.grades,
        )
    }
}

// =============================================================================
// SHARED CRUD STEPS
// =============================================================================

fn create_in<T: Record + Clone>(
    store: &mut EntityStore<T>,
    record: T,
) -> Result<T, GradebookError> {
    let id = record.id();
    if store.contains(id) {
        return Err(GradebookError::DuplicateId {
            kind: store.kind(),
            id,
        });
    }
    store.add(record.clone());
    Ok(record)
}

fn update_in<T: Record + Clone>(
    store: &mut EntityStore<T>,
    id: RecordId,
    record: T,
    policy: IdPolicy,
) -> Result<T, GradebookError> {
    let record_id = record.id();
    if record_id != id {
        if policy == IdPolicy::Strict {
            return Err(GradebookError::IdMismatch {
                kind: store.kind(),
                path_id: id,
                record_id,
            });
        }
        // The addressed record holds `id`, so any match is another record.
        if store.contains(record_id) {
            return Err(GradebookError::DuplicateId {
                kind: store.kind(),
                id: record_id,
            });
        }
    }
    store.replace(id, record.clone())?;
    Ok(record)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Registry {
        let mut registry = Registry::new();
        registry
            .create_student(Person::new(1, "Ana", "ana@example.com"))
            .expect("student");
        registry
            .create_teacher(Person::new(1, "Luis", "luis@example.com"))
            .expect("teacher");
        registry
            .create_subject(Subject::new(1, "Math"))
            .expect("subject");
        registry
    }

    #[test]
    fn create_then_list_contains_record_once() {
        let registry = populated();
        let students = registry.list_students();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Ana");
    }

    #[test]
    fn duplicate_create_rejected_without_mutation() {
        let mut registry = populated();
        let result = registry.create_student(Person::new(1, "Other", "other@example.com"));
        assert_eq!(
            result,
            Err(GradebookError::DuplicateId {
                kind: EntityKind::Student,
                id: 1
            })
        );
        assert_eq!(registry.list_students().len(), 1);
        assert_eq!(registry.list_students()[0].name, "Ana");
    }

    #[test]
    fn student_and_teacher_may_share_an_id() {
        let registry = populated();
        assert_eq!(registry.list_students()[0].id, registry.list_teachers()[0].id);
    }

    #[test]
    fn update_returns_new_record() {
        let mut registry = populated();
        let updated = registry
            .update_subject(1, Subject::new(1, "Algebra"))
            .expect("update");
        assert_eq!(updated.name, "Algebra");
        assert_eq!(registry.list_subjects()[0].name, "Algebra");
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut registry = populated();
        assert_eq!(
            registry.update_teacher(9, Person::new(9, "X", "x@example.com")),
            Err(GradebookError::NotFound {
                kind: EntityKind::Teacher,
                id: 9
            })
        );
    }

    #[test]
    fn lenient_update_accepts_mismatched_id() {
        let mut registry = populated();
        let updated = registry
            .update_student(1, Person::new(5, "Ana", "ana@example.com"))
            .expect("update");
        assert_eq!(updated.id, 5);
        assert_eq!(registry.list_students()[0].id, 5);
    }

    #[test]
    fn lenient_update_onto_taken_id_rejected() {
        let mut registry = populated();
        registry
            .create_student(Person::new(2, "Beto", "beto@example.com"))
            .expect("student");
        assert_eq!(
            registry.update_student(1, Person::new(2, "Ana", "ana@example.com")),
            Err(GradebookError::DuplicateId {
                kind: EntityKind::Student,
                id: 2
            })
        );
        let ids: Vec<_> = registry.list_students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn strict_update_rejects_mismatched_id() {
        let mut registry = Registry::with_id_policy(IdPolicy::Strict);
        registry
            .create_student(Person::new(1, "Ana", "ana@example.com"))
            .expect("student");
        assert_eq!(
            registry.update_student(1, Person::new(5, "Ana", "ana@example.com")),
            Err(GradebookError::IdMismatch {
                kind: EntityKind::Student,
                path_id: 1,
                record_id: 5
            })
        );
        assert_eq!(registry.list_students()[0].id, 1);
    }

    #[test]
    fn delete_returns_removed_record() {
        let mut registry = populated();
        let removed = registry.delete_teacher(1).expect("delete");
        assert_eq!(removed.name, "Luis");
        assert!(registry.list_teachers().is_empty());
        assert!(registry.delete_teacher(1).is_err());
    }

    #[test]
    fn grade_with_missing_student_not_added() {
        let mut registry = populated();
        assert_eq!(
            registry.create_grade(Grade::new(2, 1, 1, 4.0)),
            Err(GradebookError::MissingStudent(2))
        );
        assert!(registry.list_grades().is_empty());
    }

    #[test]
    fn grade_created_and_averaged() {
        let mut registry = populated();
        registry.create_grade(Grade::new(1, 1, 1, 2.0)).expect("grade");
        registry.create_grade(Grade::new(1, 1, 1, 4.0)).expect("grade");
        let avg = registry.average_grade(1, 1).expect("average");
        assert_eq!(avg.average, 3.0);
        assert_eq!(registry.grades_for_student(1).len(), 2);
        assert_eq!(registry.grades_matching(None, Some(1)).len(), 2);
    }

    #[test]
    fn roster_round_trip_preserves_order() {
        let mut registry = populated();
        registry
            .create_student(Person::new(0, "Zoe", "zoe@example.com"))
            .expect("student");
        registry.create_grade(Grade::new(0, 1, 1, 5.0)).expect("grade");

        let rebuilt = Registry::from_roster(registry.to_roster(), IdPolicy::Lenient)
            .expect("from roster");
        assert_eq!(rebuilt.list_students(), registry.list_students());
        assert_eq!(rebuilt.list_grades(), registry.list_grades());
        assert_eq!(rebuilt.summary(), registry.summary());
    }

    #[test]
    fn restore_keeps_grades_of_deleted_student() {
        let mut registry = populated();
        registry.create_grade(Grade::new(1, 1, 1, 4.0)).expect("grade");
        registry.delete_student(1).expect("delete");
        assert_eq!(registry.orphaned_grades(), 1);

        assert_eq!(
            Registry::from_roster(registry.to_roster(), IdPolicy::Lenient).map(|r| r.summary()),
            Err(GradebookError::MissingStudent(1))
        );
        let restored =
            Registry::restore(registry.to_roster(), IdPolicy::Lenient).expect("restore");
        assert_eq!(restored.list_grades(), registry.list_grades());
        assert_eq!(restored.orphaned_grades(), 1);
    }

    #[test]
    fn restore_still_rejects_duplicate_ids() {
        let roster = Roster {
            teachers: vec![
                Person::new(1, "Luis", "luis@example.com"),
                Person::new(1, "Other", "other@example.com"),
            ],
            ..Roster::default()
        };
        assert_eq!(
            Registry::restore(roster, IdPolicy::Lenient).map(|r| r.summary()),
            Err(GradebookError::DuplicateId {
                kind: EntityKind::Teacher,
                id: 1
            })
        );
    }

    #[test]
    fn roster_with_dangling_grade_rejected() {
        let roster = Roster {
            grades: vec![Grade::new(1, 1, 1, 3.0)],
            ..Roster::default()
        };
        assert_eq!(
            Registry::from_roster(roster, IdPolicy::Lenient).map(|r| r.summary()),
            Err(GradebookError::MissingStudent(1))
        );
    }

    #[test]
    fn summary_counts_collections() {
        let registry = populated();
        assert_eq!(
            registry.summary(),
            RegistrySummary {
                students: 1,
                teachers: 1,
                subjects: 1,
                grades: 0
            }
        );
    }
}
