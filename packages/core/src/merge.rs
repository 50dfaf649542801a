// ABOUTME: Pure identifier-keyed reconciliation for entity collections
// ABOUTME: Used to merge optimistic writes and change-feed echoes without duplicates

use crate::types::{DepartmentConfig, FeedbackItem, OwnerConfig, RoadmapItem};

/// Entities that carry a stable identity key
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for RoadmapItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for DepartmentConfig {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for OwnerConfig {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for FeedbackItem {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Where a newly inserted entity lands in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Append,
    Prepend,
}

/// One logical change to a tracked collection
#[derive(Debug, Clone, PartialEq)]
pub enum EntityChange<T> {
    Inserted(T),
    Updated(T),
    Removed(String),
}

/// Insert-or-replace by key. A row already present (e.g. an optimistic add
/// receiving its own echo) is removed first, so the collection size never
/// grows for a repeated identity.
pub fn upsert<T: Keyed>(collection: &mut Vec<T>, incoming: T, placement: Placement) {
    collection.retain(|existing| existing.key() != incoming.key());
    match placement {
        Placement::Append => collection.push(incoming),
        Placement::Prepend => collection.insert(0, incoming),
    }
}

/// Replace the matching entity in place. No match means the change is
/// dropped; an update never inserts.
pub fn replace<T: Keyed>(collection: &mut [T], incoming: T) {
    if let Some(slot) = collection
        .iter_mut()
        .find(|existing| existing.key() == incoming.key())
    {
        *slot = incoming;
    }
}

/// Remove by key; absence is not an error.
pub fn remove<T: Keyed>(collection: &mut Vec<T>, key: &str) {
    collection.retain(|existing| existing.key() != key);
}

/// Apply one change with the collection's insert placement.
pub fn apply_change<T: Keyed>(
    collection: &mut Vec<T>,
    change: EntityChange<T>,
    placement: Placement,
) {
    match change {
        EntityChange::Inserted(entity) => upsert(collection, entity, placement),
        EntityChange::Updated(entity) => replace(collection, entity),
        EntityChange::Removed(key) => remove(collection, &key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    impl Keyed for Row {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, value: u32) -> Row {
        Row {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn upsert_appends_new_rows() {
        let mut rows = vec![row("a", 1)];
        upsert(&mut rows, row("b", 2), Placement::Append);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id, "b");
    }

    #[test]
    fn upsert_replaces_existing_identity_without_growing() {
        let mut rows = vec![row("a", 1), row("b", 2)];
        upsert(&mut rows, row("a", 9), Placement::Append);
        assert_eq!(rows.len(), 2);
        let merged = rows.iter().find(|r| r.id == "a").unwrap();
        assert_eq!(merged.value, 9);
    }

    #[test]
    fn upsert_prepend_puts_newest_first() {
        let mut rows = vec![row("a", 1)];
        upsert(&mut rows, row("b", 2), Placement::Prepend);
        assert_eq!(rows[0].id, "b");
        assert_eq!(rows[1].id, "a");
    }

    #[test]
    fn replace_updates_in_place_preserving_order() {
        let mut rows = vec![row("a", 1), row("b", 2), row("c", 3)];
        replace(&mut rows, row("b", 9));
        assert_eq!(rows[1], row("b", 9));
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[2].id, "c");
    }

    #[test]
    fn replace_drops_change_for_unknown_identity() {
        let mut rows = vec![row("a", 1)];
        replace(&mut rows, row("zz", 9));
        assert_eq!(rows, vec![row("a", 1)]);
    }

    #[test]
    fn remove_is_a_noop_when_absent() {
        let mut rows = vec![row("a", 1)];
        remove(&mut rows, "zz");
        assert_eq!(rows.len(), 1);
        remove(&mut rows, "a");
        assert!(rows.is_empty());
    }

    #[test]
    fn apply_change_dispatches_by_variant() {
        let mut rows = vec![row("a", 1)];
        apply_change(
            &mut rows,
            EntityChange::Inserted(row("b", 2)),
            Placement::Append,
        );
        apply_change(
            &mut rows,
            EntityChange::Updated(row("a", 5)),
            Placement::Append,
        );
        apply_change(
            &mut rows,
            EntityChange::Removed("b".to_string()),
            Placement::Append,
        );
        assert_eq!(rows, vec![row("a", 5)]);
    }
}
