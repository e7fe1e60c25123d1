use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::models::{DateRange, FavoriteRecord};
use crate::storage::{FavoriteStore, RecordSet};
use crate::{Error, Result};

/// Favorites persisted as a single JSON file of `[id, record]` pairs.
///
/// The file is read on first access and cached. Every mutation rewrites the whole
/// file through a temporary sibling that is renamed over the target; the cached
/// set only changes once the rename succeeded.
///
/// Nothing coordinates two processes pointed at the same file: their rewrites can
/// interleave and the last one wins.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Option<RecordSet>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records: None,
        }
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&mut self) -> Result<&mut RecordSet> {
        if self.records.is_none() {
            let loaded = read_records(&self.path)?;
            info!(path = %self.path.display(), count = loaded.len(), "Loaded favorites file");
            self.records = Some(loaded);
        }
        Ok(self.records.get_or_insert_with(RecordSet::default))
    }

    /// Apply `mutate` to a copy of the records and persist it before swapping it in.
    fn commit<T>(&mut self, mutate: impl FnOnce(&mut RecordSet) -> T) -> Result<T> {
        let mut next = self.records()?.clone();
        let outcome = mutate(&mut next);
        write_records(&self.path, &next)?;
        self.records = Some(next);
        Ok(outcome)
    }
}

impl FavoriteStore for JsonFileStore {
    fn list(&mut self, range: &DateRange) -> Result<Vec<FavoriteRecord>> {
        Ok(self.records()?.matching(range))
    }

    fn get(&mut self, id: &str) -> Result<Option<FavoriteRecord>> {
        Ok(self.records()?.get(id).cloned())
    }

    fn len(&mut self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    fn put(&mut self, record: FavoriteRecord) -> Result<()> {
        self.commit(|records| records.upsert(record))
    }

    fn delete(&mut self, id: Option<&str>, fen: Option<&str>) -> Result<bool> {
        self.commit(|records| records.remove(id, fen).is_some())
    }
}

fn read_records(path: &Path) -> Result<RecordSet> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Favorites file absent, starting empty");
            return Ok(RecordSet::default());
        }
        Err(e) => {
            return Err(Error::Persistence(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let pairs: Vec<(String, FavoriteRecord)> = serde_json::from_slice(&bytes).map_err(|e| {
        Error::Persistence(format!("corrupt favorites file {}: {e}", path.display()))
    })?;
    Ok(RecordSet::from_pairs(pairs))
}

fn write_records(path: &Path, records: &RecordSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = serde_json::to_vec(&records.pairs())?;
    let tmp = temporary_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(&bytes)?;
    // Surface late write errors before the rename makes the file visible.
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)?;
    sync_parent_dir(path)?;
    Ok(())
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
