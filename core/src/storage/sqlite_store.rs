use std::path::Path;

use chrono::DateTime;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::models::{datetime_to_timestamp_millis, DateRange, FavoriteRecord};
use crate::storage::database::{initialize_schema, Connection, Database};
use crate::storage::FavoriteStore;
use crate::Result;

/// Favorites kept in an SQLite database.
///
/// Every mutation is a single statement or transaction, so concurrent writers
/// against the same file are serialized by SQLite itself.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Database::new(path).get_or_create()?;
        Ok(Self { conn })
    }

    /// A private, non-persistent database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<FavoriteRecord> {
        let millis: i64 = row.get(2)?;
        let date = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Integer,
                format!("favorite date {millis} is out of range").into(),
            )
        })?;

        Ok(FavoriteRecord {
            id: row.get(0)?,
            fen: row.get(1)?,
            date,
        })
    }
}

impl FavoriteStore for SqliteStore {
    fn list(&mut self, range: &DateRange) -> Result<Vec<FavoriteRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, fen, date FROM favorites
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY rowid",
        )?;

        let favorites = stmt
            .query_map(
                params![
                    range.from.as_ref().map(datetime_to_timestamp_millis),
                    range.to.as_ref().map(datetime_to_timestamp_millis),
                ],
                Self::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    fn get(&mut self, id: &str) -> Result<Option<FavoriteRecord>> {
        let favorite = self
            .conn
            .query_row(
                "SELECT id, fen, date FROM favorites WHERE id = ?1",
                params![id],
                Self::from_row,
            )
            .optional()?;

        Ok(favorite)
    }

    fn len(&mut self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn put(&mut self, record: FavoriteRecord) -> Result<()> {
        debug!(id = %record.id, "Upserting favorite row");
        self.conn.execute(
            "INSERT INTO favorites (id, fen, date) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET fen = excluded.fen, date = excluded.date",
            params![
                record.id,
                record.fen,
                datetime_to_timestamp_millis(&record.date),
            ],
        )?;

        Ok(())
    }

    fn delete(&mut self, id: Option<&str>, fen: Option<&str>) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let mut rows_affected = match id {
            Some(id) => tx.execute("DELETE FROM favorites WHERE id = ?1", params![id])?,
            None => 0,
        };

        if rows_affected == 0 {
            if let Some(fen) = fen {
                rows_affected = tx.execute(
                    "DELETE FROM favorites WHERE rowid =
                     (SELECT rowid FROM favorites WHERE fen = ?1 ORDER BY rowid LIMIT 1)",
                    params![fen],
                )?;
            }
        }

        tx.commit()?;
        Ok(rows_affected > 0)
    }
}
