pub mod config;
pub mod router;
pub mod server;

pub use crate::config::{load_config, Config};
pub use crate::router::{FavoritesRequest, FavoritesResponse, Router};
pub use crate::server::serve;
