//! # Entity Store
//!
//! An ordered, in-memory collection of records of one type.
//!
//! Id-based operations (`find`, `replace`, `remove`) need a `Record`; grades
//! have no id and only use `add` and `list`.
//!
//! The store knows nothing about uniqueness: `add` appends unconditionally and
//! callers (the `Registry`) decide whether an id may be inserted. Lookups are
//! linear scans on id equality and always act on the first match.

use crate::types::{EntityKind, GradebookError, Record, RecordId};

/// Ordered collection of records, tagged with the entity kind it holds.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    kind: EntityKind,
    records: Vec<T>,
}

impl<T> EntityStore<T> {
    /// Create an empty store for the given entity kind.
    #[must_use]
    pub const fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// The entity kind this store holds.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Append a record at the end of the collection.
    pub fn add(&mut self, record: T) {
        self.records.push(record);
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.records
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Record> EntityStore<T> {
    /// Find the first record with the given id.
    #[must_use]
    pub fn find(&self, id: RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Check whether any record has the given id.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.find(id).is_some()
    }

    /// Replace the first record with the given id, keeping its position.
    pub fn replace(&mut self, id: RecordId, record: T) -> Result<(), GradebookError> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(GradebookError::NotFound {
                kind: self.kind,
                id,
            })?;
        *slot = record;
        Ok(())
    }

    /// Remove the first record with the given id and return it.
    ///
    /// The remaining records keep their relative order.
    pub fn remove(&mut self, id: RecordId) -> Result<T, GradebookError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(GradebookError::NotFound {
                kind: self.kind,
                id,
            })?;
        Ok(self.records.remove(index))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Subject;

    fn store_with(ids: &[RecordId]) -> EntityStore<Subject> {
        let mut store = EntityStore::new(EntityKind::Subject);
        for id in ids {
            store.add(Subject::new(*id, format!("subject-{id}")));
        }
        store
    }

    fn ids(store: &EntityStore<Subject>) -> Vec<RecordId> {
        store.list().iter().map(|s| s.id).collect()
    }

    #[test]
    fn add_keeps_insertion_order() {
        let store = store_with(&[3, 1, 2]);
        assert_eq!(ids(&store), vec![3, 1, 2]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn add_does_not_check_uniqueness() {
        let store = store_with(&[1, 1]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn find_returns_first_match() {
        let mut store = store_with(&[1]);
        store.add(Subject::new(1, "second"));
        assert_eq!(store.find(1).map(|s| s.name.as_str()), Some("subject-1"));
        assert!(store.find(9).is_none());
    }

    #[test]
    fn replace_preserves_position() {
        let mut store = store_with(&[1, 2, 3]);
        store.replace(2, Subject::new(2, "Physics")).expect("replace");
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.list()[1].name, "Physics");
    }

    #[test]
    fn replace_missing_id_is_not_found() {
        let mut store = store_with(&[1]);
        let result = store.replace(5, Subject::new(5, "x"));
        assert_eq!(
            result,
            Err(GradebookError::NotFound {
                kind: EntityKind::Subject,
                id: 5
            })
        );
        assert_eq!(ids(&store), vec![1]);
    }

    #[test]
    fn remove_returns_record_and_keeps_order() {
        let mut store = store_with(&[1, 2, 3]);
        let removed = store.remove(2).expect("remove");
        assert_eq!(removed.id, 2);
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn remove_missing_id_leaves_store_unchanged() {
        let mut store = store_with(&[1, 2]);
        assert!(store.remove(7).is_err());
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn empty_store() {
        let store: EntityStore<Subject> = EntityStore::new(EntityKind::Subject);
        assert!(store.is_empty());
        assert_eq!(store.kind(), EntityKind::Subject);
    }
}
