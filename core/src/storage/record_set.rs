use indexmap::IndexMap;

use crate::models::{DateRange, FavoriteRecord};

/// Insertion-ordered map of favorites keyed by id.
///
/// Overwriting an id keeps its original position; removal preserves the order of
/// the remaining records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: IndexMap<String, FavoriteRecord>,
}

impl RecordSet {
    pub fn from_pairs(pairs: Vec<(String, FavoriteRecord)>) -> Self {
        Self {
            records: pairs.into_iter().collect(),
        }
    }

    /// The `[id, record]` pairs in insertion order, as written to disk
    pub fn pairs(&self) -> Vec<(&String, &FavoriteRecord)> {
        self.records.iter().collect()
    }

    pub fn upsert(&mut self, record: FavoriteRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&FavoriteRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn matching(&self, range: &DateRange) -> Vec<FavoriteRecord> {
        self.records
            .values()
            .filter(|record| range.contains(&record.date))
            .cloned()
            .collect()
    }

    /// Remove by id, falling back to the earliest-inserted record with `fen`.
    pub fn remove(&mut self, id: Option<&str>, fen: Option<&str>) -> Option<FavoriteRecord> {
        if let Some(removed) = id.and_then(|id| self.records.shift_remove(id)) {
            return Some(removed);
        }

        let fen = fen?;
        let index = self.records.values().position(|record| record.fen == fen)?;
        self.records.shift_remove_index(index).map(|(_, record)| record)
    }
}
