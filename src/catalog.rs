use std::collections::HashMap;

use thiserror::Error;

/// Prefix of every album URI the catalog hands out.
pub const ALBUM_URI_PREFIX: &str = "spotify:album:";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("'{0}' is not a valid album identifier")]
    InvalidIdentifier(String),

    #[error("catalog refused the request, check the client credentials")]
    Unauthorized,

    #[error("catalog unreachable: {0}")]
    Unreachable(String),

    #[error("unexpected catalog response: {0}")]
    Malformed(String),
}

/// Display metadata of one album, as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumInfo {
    /// Canonical `spotify:album:<id>` URI.
    pub identifier: String,
    pub title: String,
    pub artist: String,
    pub cover_url: String,
}

/// Resolves an album identifier to its display metadata.
pub trait Catalog {
    fn album(&self, identifier: &str) -> Result<AlbumInfo, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn album(&self, identifier: &str) -> Result<AlbumInfo, CatalogError> {
        (**self).album(identifier)
    }
}

/// Extracts the bare base-62 album id from either a `spotify:album:<id>` URI or the id itself.
pub fn album_id(identifier: &str) -> Result<&str, CatalogError> {
    let id = identifier
        .trim()
        .strip_prefix(ALBUM_URI_PREFIX)
        .unwrap_or(identifier.trim());

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CatalogError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(id)
}

/// Canonical URI for an album id or URI.
pub fn album_uri(identifier: &str) -> Result<String, CatalogError> {
    album_id(identifier).map(|id| format!("{ALBUM_URI_PREFIX}{id}"))
}

/// A fixed table of albums. Used in tests and when working offline.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    albums: HashMap<String, AlbumInfo>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an album under its exact identifier.
    pub fn with_album(
        mut self,
        identifier: &str,
        title: &str,
        artist: &str,
        cover_url: &str,
    ) -> Self {
        self.albums.insert(
            identifier.to_string(),
            AlbumInfo {
                identifier: identifier.to_string(),
                title: title.to_string(),
                artist: artist.to_string(),
                cover_url: cover_url.to_string(),
            },
        );
        self
    }
}

impl Catalog for MemoryCatalog {
    fn album(&self, identifier: &str) -> Result<AlbumInfo, CatalogError> {
        self.albums
            .get(identifier)
            .cloned()
            .ok_or_else(|| CatalogError::InvalidIdentifier(identifier.to_string()))
    }
}
