mod database;
mod json_file_store;
mod memory_store;
mod record_set;
mod sqlite_store;

pub use database::{Connection, Database};
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use record_set::RecordSet;
pub use sqlite_store::SqliteStore;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{DateRange, FavoriteRecord};
use crate::Result;

/// The authoritative set of favorites.
///
/// Methods take `&mut self` because file-backed stores load lazily. Callers that
/// share a store across threads wrap it in a mutex, which also makes every
/// read-mutate-persist cycle single-writer.
pub trait FavoriteStore: Send {
    /// Records whose date falls inside `range`, in insertion order
    fn list(&mut self, range: &DateRange) -> Result<Vec<FavoriteRecord>>;

    fn get(&mut self, id: &str) -> Result<Option<FavoriteRecord>>;

    fn len(&mut self) -> Result<usize>;

    fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Store a fully formed record, replacing any record with the same id.
    ///
    /// Prefer [`FavoriteStore::create`], which stamps the date.
    fn put(&mut self, record: FavoriteRecord) -> Result<()>;

    /// Delete by `id`, or failing that the earliest record whose fen is `fen`.
    ///
    /// Returns whether something was removed. A miss is not an error.
    fn delete(&mut self, id: Option<&str>, fen: Option<&str>) -> Result<bool>;

    /// Insert or overwrite a favorite dated now and return its id.
    fn create(&mut self, fen: &str, id: Option<&str>) -> Result<String> {
        let record = FavoriteRecord::new(fen, id)?;
        let id = record.id.clone();
        self.put(record)?;
        Ok(id)
    }
}

/// Which storage backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    Json,
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::Json => "json",
            Backend::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "json" => Ok(Backend::Json),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(format!(
                "unknown backend `{other}`, expected one of: memory, json, sqlite"
            )),
        }
    }
}

/// Open a store of the given kind. `path` is ignored by the memory backend.
pub fn open(backend: Backend, path: &Path) -> Result<Box<dyn FavoriteStore>> {
    let store: Box<dyn FavoriteStore> = match backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::Json => Box::new(JsonFileStore::new(path)),
        Backend::Sqlite => Box::new(SqliteStore::open(path)?),
    };
    Ok(store)
}
