//! Storage for favorite chess positions.
//!
//! A [`storage::FavoriteStore`] owns a set of [`models::FavoriteRecord`]s keyed by id.
//! Three backends are provided: an in-memory map, a single JSON file rewritten on
//! every mutation, and an SQLite database.
pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, ErrorKind, Result};
