//! Identity-keyed record storage shared by every entity in the books.
//!
//! Every read path filters out soft-deleted rows through [`Record::is_deleted`], so a
//! deleted member is invisible to `get`, `iter`, `find`, `count`, and `exists` alike.

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::{Identifiable, Record, RecordId};

fn first_id() -> RecordId {
    1
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Table<T> {
    next_id: RecordId,
    rows: Vec<T>,
}

/// On-disk shape of a table before the sequence is reconciled with its rows.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct StoredTable<T> {
    #[serde(default = "first_id")]
    next_id: RecordId,
    #[serde(default)]
    rows: Vec<T>,
}

impl<'de, T> Deserialize<'de> for Table<T>
where
    T: Deserialize<'de> + Identifiable,
{
    /// A stale or missing `next_id` never hands out an identity already taken.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = StoredTable::<T>::deserialize(deserializer)?;
        let floor = stored
            .rows
            .iter()
            .map(|row| row.id() + 1)
            .max()
            .unwrap_or_else(first_id);
        Ok(Self {
            next_id: stored.next_id.max(floor),
            rows: stored.rows,
        })
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            rows: Vec::new(),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next identity value and stores the row built from it.
    pub fn insert_with<F>(&mut self, build: F) -> &T
    where
        F: FnOnce(RecordId) -> T,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(build(id));
        let index = self.rows.len() - 1;
        &self.rows[index]
    }

    /// Stores a row with a fixed identity, advancing the sequence past it.
    pub fn seed(&mut self, row: T) {
        self.next_id = self.next_id.max(row.id() + 1);
        self.rows.push(row);
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.iter().find(|row| row.id() == id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|row| row.id() == id && !row.is_deleted())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter().filter(|row| !row.is_deleted())
    }

    pub fn find<P>(&self, mut predicate: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|row| predicate(row)).collect()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn count_where<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|row| predicate(row)).count()
    }

    pub fn exists(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Replaces the live row sharing `row`'s identity. Returns `false` when absent.
    pub fn update(&mut self, row: T) -> bool {
        match self.get_mut(row.id()) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    /// Soft-deletes the row when its type supports it, otherwise removes it.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let Some(index) = self
            .rows
            .iter()
            .position(|row| row.id() == id && !row.is_deleted())
        else {
            return false;
        };
        if !self.rows[index].mark_deleted() {
            self.rows.remove(index);
        }
        true
    }

    /// Every stored row, deleted ones included.
    pub fn raw_rows(&self) -> &[T] {
        &self.rows
    }

    pub fn next_id(&self) -> RecordId {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Plain {
        id: RecordId,
    }

    impl Identifiable for Plain {
        fn id(&self) -> RecordId {
            self.id
        }
    }

    impl Record for Plain {}

    #[derive(Debug, Clone, PartialEq)]
    struct Soft {
        id: RecordId,
        deleted: bool,
    }

    impl Identifiable for Soft {
        fn id(&self) -> RecordId {
            self.id
        }
    }

    impl Record for Soft {
        fn is_deleted(&self) -> bool {
            self.deleted
        }

        fn mark_deleted(&mut self) -> bool {
            self.deleted = true;
            true
        }
    }

    #[test]
    fn insert_allocates_increasing_ids() {
        let mut table = Table::new();
        let first = table.insert_with(|id| Plain { id }).id;
        let second = table.insert_with(|id| Plain { id }).id;
        assert_eq!((first, second), (1, 2));
        assert_eq!(table.next_id(), 3);
    }

    #[test]
    fn seeding_advances_sequence() {
        let mut table = Table::new();
        table.seed(Plain { id: 5 });
        let next = table.insert_with(|id| Plain { id }).id;
        assert_eq!(next, 6);
    }

    #[test]
    fn hard_delete_removes_row() {
        let mut table = Table::new();
        table.insert_with(|id| Plain { id });
        assert!(table.delete(1));
        assert!(table.raw_rows().is_empty());
        assert!(!table.delete(1));
    }

    #[test]
    fn soft_delete_hides_row_from_every_read() {
        let mut table = Table::new();
        table.insert_with(|id| Soft { id, deleted: false });
        table.insert_with(|id| Soft { id, deleted: false });
        assert!(table.delete(1));

        assert_eq!(table.raw_rows().len(), 2);
        assert!(table.get(1).is_none());
        assert!(!table.exists(1));
        assert_eq!(table.count(), 1);
        assert_eq!(table.find(|_| true).len(), 1);
        assert!(!table.update(Soft {
            id: 1,
            deleted: false
        }));
        assert!(!table.delete(1));
    }

    #[test]
    fn loaded_rows_without_a_sequence_do_not_reuse_ids() {
        let mut table: Table<Plain> =
            serde_json::from_str(r#"{"rows":[{"id":3},{"id":1}]}"#).expect("table");
        assert_eq!(table.next_id(), 4);
        assert_eq!(table.insert_with(|id| Plain { id }).id, 4);
    }

    #[test]
    fn stale_sequence_is_raised_past_stored_rows() {
        let table: Table<Plain> =
            serde_json::from_str(r#"{"next_id":2,"rows":[{"id":7}]}"#).expect("table");
        assert_eq!(table.next_id(), 8);

        let empty: Table<Plain> = serde_json::from_str("{}").expect("table");
        assert_eq!(empty.next_id(), 1);
        assert!(empty.is_empty());
    }

    #[test]
    fn table_round_trips_through_json() {
        let mut table = Table::new();
        table.insert_with(|id| Plain { id });
        table.insert_with(|id| Plain { id });
        let text = serde_json::to_string(&table).expect("serialize");
        let back: Table<Plain> = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, table);
    }
}
