#![allow(clippy::uninlined_format_args)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
mod fs;
pub mod rating;
pub mod record;
pub mod report;
pub mod spotify;
pub mod store;
pub mod utils;

pub use catalog::{AlbumInfo, Catalog, CatalogError, MemoryCatalog};
pub use error::StoreError;
pub use rating::{Rating, RatingError};
pub use record::Record;
pub use store::{Collection, Shelf};
