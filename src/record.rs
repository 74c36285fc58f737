use std::fmt;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::catalog::{AlbumInfo, Catalog, CatalogError};
use crate::rating::Rating;

/// One catalog album, optionally rated.
///
/// Identity is the catalog identifier alone: two records with the same identifier
/// are equal whatever their rating or display fields say.
#[derive(Debug, Clone)]
pub struct Record {
    identifier: String,
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    rating: Option<Rating>,
}

impl Record {
    pub fn new(info: AlbumInfo, rating: Option<Rating>) -> Self {
        Record {
            identifier: info.identifier,
            title: display_title(&info.title),
            artist: info.artist,
            cover_url: info.cover_url,
            rating,
        }
    }

    /// Looks `identifier` up in the catalog and builds a record from the answer.
    /// Lookup errors are returned as is.
    pub fn fetch<C: Catalog + ?Sized>(
        catalog: &C,
        identifier: &str,
        rating: Option<Rating>,
    ) -> Result<Self, CatalogError> {
        debug!("Fetching {}", identifier);
        let info = catalog.album(identifier)?;
        Ok(Record::new(info, rating))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn rate(&mut self, rating: Option<Rating>) {
        self.rating = rating;
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

/// Canonical text form: `identifier` or `identifier/rating`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rating {
            Some(rating) => write!(f, "{}/{}", self.identifier, rating),
            None => write!(f, "{}", self.identifier),
        }
    }
}

/// Drops a trailing parenthetical such as " (Deluxe Edition)" and everything after it.
pub fn display_title(raw: &str) -> String {
    match raw.find('(') {
        Some(0) | None => raw.to_string(),
        Some(idx) => raw[..idx].trim_end().to_string(),
    }
}
