//! Method dispatch for the favorites endpoint.
//!
//! | Method  | Action                               | Status |
//! |---------|--------------------------------------|--------|
//! | OPTIONS | CORS preflight                       | 200    |
//! | GET     | list, filtered by `from`/`to`        | 200    |
//! | POST    | create from `{fen, id?}`             | 201    |
//! | DELETE  | delete by `{id?, fen?}`              | 200    |
//! | other   | `{"error": "Method not allowed"}`    | 405    |
//!
//! Any failure while serving a supported method becomes a `500` carrying the
//! error message.
mod request;
mod response;

pub use request::{CreateFavorite, DeleteFavorite, FavoritesRequest};
pub use response::{FavoritesResponse, ALLOWED_METHODS};

use std::sync::{Mutex, MutexGuard, PoisonError};

use fenfav_core::storage::FavoriteStore;
use fenfav_core::Result;
use http::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

/// The store operation a request maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    List,
    Create,
    Delete,
}

impl Route {
    pub fn from_method(method: &Method) -> Option<Self> {
        [
            (Method::OPTIONS, Route::Preflight),
            (Method::GET, Route::List),
            (Method::POST, Route::Create),
            (Method::DELETE, Route::Delete),
        ]
        .into_iter()
        .find(|(candidate, _)| candidate == method)
        .map(|(_, route)| route)
    }
}

#[derive(Serialize)]
struct Created {
    success: bool,
    id: String,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
}

/// Maps requests onto a [`FavoriteStore`].
///
/// The store sits behind a mutex: each request's read-mutate-persist sequence
/// runs to completion before the next one touches the store.
pub struct Router {
    store: Mutex<Box<dyn FavoriteStore>>,
}

impl Router {
    pub fn new(store: Box<dyn FavoriteStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with_store<T>(&self, f: impl FnOnce(&mut dyn FavoriteStore) -> T) -> T {
        let mut store = self.lock();
        f(&mut **store)
    }

    pub fn handle(&self, request: &FavoritesRequest) -> FavoritesResponse {
        let Some(route) = Route::from_method(&request.method) else {
            warn!(method = %request.method, "Rejected unsupported method");
            return FavoritesResponse::method_not_allowed();
        };

        match self.dispatch(route, request) {
            Ok(response) => response,
            Err(e) => {
                warn!(?route, kind = ?e.kind(), error = %e, "Favorites request failed");
                FavoritesResponse::error(&e)
            }
        }
    }

    fn dispatch(&self, route: Route, request: &FavoritesRequest) -> Result<FavoritesResponse> {
        match route {
            Route::Preflight => Ok(FavoritesResponse::empty(StatusCode::OK)),
            Route::List => {
                let range = request.date_range()?;
                let records = self.lock().list(&range)?;
                debug!(count = records.len(), "Listed favorites");
                FavoritesResponse::json(StatusCode::OK, &records)
            }
            Route::Create => {
                let body: CreateFavorite = request.json_body()?;
                let id = self.lock().create(&body.fen, body.id.as_deref())?;
                info!(%id, "Created favorite");
                FavoritesResponse::json(StatusCode::CREATED, &Created { success: true, id })
            }
            Route::Delete => {
                let body: DeleteFavorite = request.json_body()?;
                let removed = self
                    .lock()
                    .delete(body.id.as_deref(), body.fen.as_deref())?;
                info!(id = ?body.id, removed, "Deleted favorite");
                FavoritesResponse::json(StatusCode::OK, &Deleted { success: true })
            }
        }
    }

    // Stores apply mutations atomically, so a panic elsewhere cannot leave one
    // half-written and the poisoned guard is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Box<dyn FavoriteStore>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
