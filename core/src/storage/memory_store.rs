use tracing::debug;

use crate::models::{DateRange, FavoriteRecord};
use crate::storage::{FavoriteStore, RecordSet};
use crate::Result;

/// Favorites held in process memory only. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RecordSet,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoriteStore for MemoryStore {
    fn list(&mut self, range: &DateRange) -> Result<Vec<FavoriteRecord>> {
        Ok(self.records.matching(range))
    }

    fn get(&mut self, id: &str) -> Result<Option<FavoriteRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn len(&mut self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn put(&mut self, record: FavoriteRecord) -> Result<()> {
        debug!(id = %record.id, "Storing favorite in memory");
        self.records.upsert(record);
        Ok(())
    }

    fn delete(&mut self, id: Option<&str>, fen: Option<&str>) -> Result<bool> {
        Ok(self.records.remove(id, fen).is_some())
    }
}
