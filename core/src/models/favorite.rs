use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::now_millis;
use crate::{Error, Result};

/// A position the user marked as a favorite.
///
/// `fen` is opaque here: no chess-specific validation happens beyond requiring
/// a non-empty string. `date` is stamped by the store and serialized in the
/// `2024-01-01T00:00:00.000Z` shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    pub id: String,
    pub fen: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

impl FavoriteRecord {
    /// Create a new record stamped with the current time.
    ///
    /// A missing or empty `id` is replaced by a generated one.
    pub fn new(fen: &str, id: Option<&str>) -> Result<Self> {
        if fen.is_empty() {
            return Err(Error::Validation("fen is required".to_string()));
        }

        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Self::generate_id(),
        };

        Ok(Self {
            id,
            fen: fen.to_string(),
            date: now_millis(),
        })
    }

    /// Create a record with an explicit date (for testing or import)
    pub fn with_date(id: String, fen: String, date: DateTime<Utc>) -> Self {
        Self { id, fen, date }
    }

    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
