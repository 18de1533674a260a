//! Album use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for album store callers.
//! - Emit metadata-only diagnostic events around each store call.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Repository errors are returned unchanged.
//! - Log events never include titles, artists or prices.

use crate::model::album::{Album, AlbumId, NewAlbum};
use crate::repo::album_repo::{AlbumRepository, RepoError, RepoResult};
use log::{info, warn};
use std::time::Instant;

/// Use-case service wrapper for album store operations.
pub struct AlbumService<R: AlbumRepository> {
    repo: R,
}

impl<R: AlbumRepository> AlbumService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists albums for one artist. An unknown artist yields an empty list.
    pub fn albums_by_artist(&self, artist: &str) -> RepoResult<Vec<Album>> {
        let started_at = Instant::now();
        let result = self.repo.albums_by_artist(artist);
        match &result {
            Ok(albums) => info!(
                "event=album_list module=service status=ok count={} duration_ms={}",
                albums.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=album_list module=service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Gets one album by store id.
    pub fn album_by_id(&self, id: AlbumId) -> RepoResult<Album> {
        let started_at = Instant::now();
        let result = self.repo.album_by_id(id);
        match &result {
            Ok(_) => info!(
                "event=album_get module=service status=ok album_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=album_get module=service status=error album_id={} duration_ms={} error={}",
                id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Adds an album and returns its generated id.
    pub fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId> {
        let started_at = Instant::now();
        let result = self.repo.add_album(album);
        match &result {
            Ok(id) => info!(
                "event=album_add module=service status=ok album_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=album_add module=service status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                error_code(err)
            ),
        }
        result
    }
}

// Write errors can echo constraint text containing row values.
fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Write { .. } => "album_write_failed",
        RepoError::IdentityRetrieval { .. } => "album_identity_unavailable",
        _ => "album_add_failed",
    }
}
