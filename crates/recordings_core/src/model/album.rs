//! Album domain model.
//!
//! # Responsibility
//! - Define the persisted album record and the insert payload.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `price` is non-negative by convention; nothing here enforces it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-generated album identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type AlbumId = i64;

/// One music release as stored in the `album` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// Insert payload for a new album.
///
/// Has no `id` field: identity is always generated by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl NewAlbum {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Attaches a store-assigned id, producing the persisted record shape.
    pub fn with_id(self, id: AlbumId) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            price: self.price,
        }
    }
}

/// Re-insert helper; the source id is dropped.
impl From<&Album> for NewAlbum {
    fn from(value: &Album) -> Self {
        Self {
            title: value.title.clone(),
            artist: value.artist.clone(),
            price: value.price,
        }
    }
}

impl Display for Album {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} \"{}\" by {} ({:.2})",
            self.id, self.title, self.artist, self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Album, NewAlbum};

    #[test]
    fn display_formats_price_with_two_decimals() {
        let album = NewAlbum::new("Jeru", "Gerry Mulligan", 17.9).with_id(3);
        assert_eq!(album.to_string(), "#3 \"Jeru\" by Gerry Mulligan (17.90)");
    }

    #[test]
    fn new_album_from_album_drops_id() {
        let album = Album {
            id: 42,
            title: "Blue Train".to_string(),
            artist: "John Coltrane".to_string(),
            price: 56.99,
        };
        let payload = NewAlbum::from(&album);
        assert_eq!(payload, NewAlbum::new("Blue Train", "John Coltrane", 56.99));
    }
}
