//! Data-access core for the recordings album catalog.
//! Owns the album schema, the store contract and its SQLite implementation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, open_db_with_options, ping, DbError, DbOptions};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::album::{Album, AlbumId, NewAlbum};
pub use repo::album_repo::{
    AlbumOp, AlbumRepository, RepoError, RepoResult, SqliteAlbumRepository,
};
pub use service::album_service::AlbumService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
