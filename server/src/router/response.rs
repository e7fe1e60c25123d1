use bytes::Bytes;
use fenfav_core::{Error, ErrorKind};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// Status, headers and body produced by the router.
///
/// Every response carries the permissive CORS headers.
#[derive(Debug, Clone)]
pub struct FavoritesResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

impl FavoritesResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: cors_headers(),
            body: Bytes::new(),
        }
    }

    /// A response with `value` serialized as the JSON body
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::json_bytes(status, body.into()))
    }

    pub fn method_not_allowed() -> Self {
        Self::error_body(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody {
                error: "Method not allowed",
                kind: None,
            },
        )
    }

    /// `500` with `{"error": <message>, "kind": <kind>}`
    pub fn error(error: &Error) -> Self {
        Self::error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorBody {
                error: &error.to_string(),
                kind: Some(error.kind()),
            },
        )
    }

    fn error_body(status: StatusCode, body: &ErrorBody<'_>) -> Self {
        let bytes = serde_json::to_vec(body)
            .unwrap_or_else(|_| br#"{"error":"Internal error"}"#.to_vec());
        Self::json_bytes(status, bytes.into())
    }

    fn json_bytes(status: StatusCode, body: Bytes) -> Self {
        let mut headers = cors_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers
}
