use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::rating::RatingError;
use crate::store::Shelf;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{identifier} is not in the {shelf}")]
    NotFound { shelf: Shelf, identifier: String },

    #[error("{0} is already in the library")]
    AlreadyInLibrary(String),

    #[error("lookup failed: {0}")]
    Lookup(#[from] CatalogError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} is not a valid collection file: {source}", path.display())]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} holds an invalid entry '{entry}': {source}", path.display())]
    InvalidEntry {
        path: PathBuf,
        entry: String,
        source: RatingError,
    },
}
