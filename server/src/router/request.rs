use bytes::Bytes;
use fenfav_core::models::DateRange;
use fenfav_core::{Error, Result};
use http::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A transport-independent view of an inbound request to the favorites endpoint
#[derive(Debug, Clone)]
pub struct FavoritesRequest {
    pub method: Method,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub body: Bytes,
}

impl FavoritesRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: None,
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Date bounds from the `from`/`to` query parameters
    pub fn date_range(&self) -> Result<DateRange> {
        let query: ListQuery = match self.query.as_deref() {
            Some(raw) if !raw.is_empty() => serde_html_form::from_str(raw)
                .map_err(|e| Error::MalformedRequest(format!("invalid query string: {e}")))?,
            _ => ListQuery::default(),
        };
        DateRange::parse(query.from.as_deref(), query.to.as_deref())
    }

    /// Decode the body into `T`.
    ///
    /// Bytes that are not JSON are a malformed request; JSON of the wrong shape
    /// (missing or mistyped fields, unknown fields) is a validation error.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        let value: serde_json::Value = serde_json::from_slice(&self.body)
            .map_err(|e| Error::MalformedRequest(format!("invalid JSON body: {e}")))?;
        serde_json::from_value(value).map_err(|e| Error::Validation(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    from: Option<String>,
    to: Option<String>,
}

/// Body of a `POST`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFavorite {
    pub fen: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of a `DELETE`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteFavorite {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fen: Option<String>,
}
