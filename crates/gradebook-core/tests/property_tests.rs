//! # Property-Based Tests
//!
//! Invariants of the registry façade checked over generated inputs.

use gradebook_core::{EntityKind, Grade, GradebookError, Person, Registry, Subject};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn person(id: i64) -> Person {
    Person::new(id, format!("person-{id}"), format!("p{id}@example.com"))
}

fn ids(people: &[Person]) -> Vec<i64> {
    people.iter().map(|p| p.id).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every id ends up listed exactly once; repeats are rejected as duplicates.
    #[test]
    fn create_keeps_ids_unique(raw_ids in vec(-50i64..50, 0..60)) {
        let mut registry = Registry::new();
        let mut seen = BTreeSet::new();

        for id in &raw_ids {
            let result = registry.create_student(person(*id));
            if seen.insert(*id) {
                prop_assert_eq!(result, Ok(person(*id)));
            } else {
                prop_assert_eq!(
                    result,
                    Err(GradebookError::DuplicateId { kind: EntityKind::Student, id: *id })
                );
            }
        }

        let listed = ids(registry.list_students());
        prop_assert_eq!(listed.len(), seen.len());
        let unique: BTreeSet<i64> = listed.iter().copied().collect();
        prop_assert_eq!(unique, seen);
    }

    /// Insertion order is preserved by listing.
    #[test]
    fn list_preserves_insertion_order(raw_ids in vec(0i64..1000, 0..40)) {
        let mut registry = Registry::new();
        let mut expected = Vec::new();
        for id in raw_ids {
            if registry.create_teacher(person(id)).is_ok() {
                expected.push(id);
            }
        }
        prop_assert_eq!(ids(registry.list_teachers()), expected);
    }

    /// Update keeps the position; delete removes exactly the addressed record.
    #[test]
    fn update_and_delete_by_position(count in 1usize..20, pick in 0usize..20) {
        let mut registry = Registry::new();
        for id in 0..count as i64 {
            registry.create_student(person(id)).expect("create");
        }
        let target = (pick % count) as i64;

        let replacement = Person::new(target, "Renamed", "renamed@example.com");
        registry.update_student(target, replacement.clone()).expect("update");
        prop_assert_eq!(&registry.list_students()[target as usize], &replacement);

        registry.delete_student(target).expect("delete");
        let remaining = ids(registry.list_students());
        prop_assert_eq!(remaining.len(), count - 1);
        prop_assert!(!remaining.contains(&target));
    }

    /// Failed update/delete leave the collection unchanged.
    #[test]
    fn missing_id_operations_are_idempotent_failures(
        present in vec(0i64..100, 0..20),
        missing in 100i64..200,
    ) {
        let mut registry = Registry::new();
        for id in present {
            let _ = registry.create_subject(Subject::new(id, "s"));
        }
        let before = registry.list_subjects().to_vec();

        prop_assert!(registry.update_subject(missing, Subject::new(missing, "x")).is_err());
        prop_assert!(registry.delete_subject(missing).is_err());
        prop_assert_eq!(registry.list_subjects(), before.as_slice());
    }

    /// The average equals the arithmetic mean of the matching values.
    #[test]
    fn average_is_arithmetic_mean(values in vec(0u32..=100, 1..30)) {
        let mut registry = Registry::new();
        registry.create_student(person(1)).expect("student");
        registry.create_teacher(person(1)).expect("teacher");
        registry.create_subject(Subject::new(1, "Math")).expect("subject");
        registry.create_subject(Subject::new(2, "Art")).expect("subject");
        // Noise in another subject must not affect the mean.
        registry.create_grade(Grade::new(1, 1, 2, 1000.0)).expect("noise");

        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        for v in &values {
            registry.create_grade(Grade::new(1, 1, 1, *v)).expect("grade");
        }

        let expected = values.iter().sum::<f64>() / values.len() as f64;
        let avg = registry.average_grade(1, 1).expect("average");
        prop_assert!((avg.average - expected).abs() < 1e-9);
        prop_assert_eq!(avg.count, values.len());
    }

    /// Grades referencing an unknown student never reach the collection.
    #[test]
    fn dangling_student_grade_rejected(student_id in 2i64..1000, value in 0.0f64..10.0) {
        let mut registry = Registry::new();
        registry.create_student(person(1)).expect("student");
        registry.create_teacher(person(1)).expect("teacher");
        registry.create_subject(Subject::new(1, "Math")).expect("subject");

        let result = registry.create_grade(Grade::new(student_id, 1, 1, value));
        prop_assert_eq!(result, Err(GradebookError::MissingStudent(student_id)));
        prop_assert!(registry.list_grades().is_empty());
    }
}
