use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::fs::{StoredEntry, read_entries, write_entries};
use crate::rating::Rating;
use crate::record::Record;

/// Which of the two sets an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Library,
    Wishlist,
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shelf::Library => write!(f, "library"),
            Shelf::Wishlist => write!(f, "wishlist"),
        }
    }
}

/// Owned, rated albums and the wishlist of albums still to get.
///
/// Each set is keyed by identifier, so an album appears at most once per set,
/// and never in both at once.
/// Wishlist inserts keep the entry already there; library inserts replace it.
#[derive(Debug)]
pub struct Collection {
    library_path: PathBuf,
    wishlist_path: PathBuf,
    library: BTreeMap<String, Record>,
    wishlist: BTreeMap<String, Record>,
}

impl Collection {
    /// An empty collection that will be saved to the given files.
    pub fn new(library_path: impl Into<PathBuf>, wishlist_path: impl Into<PathBuf>) -> Self {
        Collection {
            library_path: library_path.into(),
            wishlist_path: wishlist_path.into(),
            library: BTreeMap::new(),
            wishlist: BTreeMap::new(),
        }
    }

    /// Loads both files, looking every entry up in `catalog` again.
    /// The first failed lookup aborts the load.
    pub fn open<C: Catalog + ?Sized>(
        library_path: impl Into<PathBuf>,
        wishlist_path: impl Into<PathBuf>,
        catalog: &C,
    ) -> Result<Self, StoreError> {
        let mut collection = Collection::new(library_path, wishlist_path);

        collection.library = load_shelf(&collection.library_path, catalog)?;
        collection.wishlist = load_shelf(&collection.wishlist_path, catalog)?;

        let overlap: Vec<String> = collection
            .wishlist
            .keys()
            .filter(|id| collection.library.contains_key(*id))
            .cloned()
            .collect();
        for id in overlap {
            warn!("{} is both owned and wishlisted, dropping it from the wishlist", id);
            collection.wishlist.remove(&id);
        }

        info!(
            "Loaded {} library and {} wishlist albums",
            collection.library.len(),
            collection.wishlist.len()
        );
        Ok(collection)
    }

    pub fn library(&self) -> impl Iterator<Item = &Record> {
        self.library.values()
    }

    pub fn wishlist(&self) -> impl Iterator<Item = &Record> {
        self.wishlist.values()
    }

    pub fn shelf(&self, shelf: Shelf) -> impl Iterator<Item = &Record> {
        self.set(shelf).values()
    }

    pub fn get(&self, shelf: Shelf, identifier: &str) -> Option<&Record> {
        self.set(shelf).get(identifier)
    }

    pub fn contains(&self, shelf: Shelf, identifier: &str) -> bool {
        self.set(shelf).contains_key(identifier)
    }

    pub fn len(&self, shelf: Shelf) -> usize {
        self.set(shelf).len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty() && self.wishlist.is_empty()
    }

    /// Returns `false` when the album was already wishlisted.
    pub fn add_to_wishlist(&mut self, record: Record) -> Result<bool, StoreError> {
        if self.library.contains_key(record.identifier()) {
            return Err(StoreError::AlreadyInLibrary(record.identifier().to_string()));
        }
        if self.wishlist.contains_key(record.identifier()) {
            warn!("{} is already on the wishlist", record.identifier());
            return Ok(false);
        }

        info!("Wishlisted {} by {}", record.title, record.artist);
        let mut record = record;
        record.rate(None);
        self.wishlist.insert(record.identifier().to_string(), record);
        Ok(true)
    }

    pub fn remove_from_wishlist(&mut self, identifier: &str) -> Result<Record, StoreError> {
        let record = self
            .wishlist
            .remove(identifier)
            .ok_or_else(|| not_found(Shelf::Wishlist, identifier))?;

        info!("Removed {} from the wishlist", identifier);
        Ok(record)
    }

    /// Rates `record` and files it in the library, taking it off the wishlist first
    /// if it was there. An album already owned is replaced, which re-rates it.
    pub fn add_to_library(&mut self, mut record: Record, rating: Rating) {
        if self.wishlist.remove(record.identifier()).is_some() {
            debug!("Moving {} off the wishlist", record.identifier());
        }

        record.rate(Some(rating));
        info!("Added {} by {} to the library at {}", record.title, record.artist, rating);
        self.library.insert(record.identifier().to_string(), record);
    }

    /// Moves a wishlisted album into the library without another lookup.
    pub fn move_to_library(&mut self, identifier: &str, rating: Rating) -> Result<(), StoreError> {
        let record = self
            .wishlist
            .get(identifier)
            .cloned()
            .ok_or_else(|| not_found(Shelf::Wishlist, identifier))?;

        self.add_to_library(record, rating);
        Ok(())
    }

    pub fn rate_in_library(&mut self, identifier: &str, rating: Rating) -> Result<(), StoreError> {
        let record = self
            .library
            .get_mut(identifier)
            .ok_or_else(|| not_found(Shelf::Library, identifier))?;

        record.rate(Some(rating));
        info!("Rated {} at {}", identifier, rating);
        Ok(())
    }

    /// Removes an owned album. The returned record has its rating cleared.
    pub fn remove_from_library(&mut self, identifier: &str) -> Result<Record, StoreError> {
        let mut record = self
            .library
            .remove(identifier)
            .ok_or_else(|| not_found(Shelf::Library, identifier))?;

        record.rate(None);
        info!("Removed {} from the library", identifier);
        Ok(record)
    }

    pub fn clear_library(&mut self) {
        info!("Clearing {} library albums", self.library.len());
        self.library.clear();
    }

    pub fn clear_wishlist(&mut self) {
        info!("Clearing {} wishlist albums", self.wishlist.len());
        self.wishlist.clear();
    }

    pub fn clear_all(&mut self) {
        self.clear_library();
        self.clear_wishlist();
    }

    /// Writes both sets, overwriting previous contents. Each file is replaced
    /// atomically, but the pair is not: the wishlist is written first.
    pub fn save(&self) -> Result<(), StoreError> {
        write_entries(&self.wishlist_path, &entries(&self.wishlist))?;
        write_entries(&self.library_path, &entries(&self.library))?;
        Ok(())
    }

    pub fn paths(&self) -> (&Path, &Path) {
        (&self.library_path, &self.wishlist_path)
    }

    fn set(&self, shelf: Shelf) -> &BTreeMap<String, Record> {
        match shelf {
            Shelf::Library => &self.library,
            Shelf::Wishlist => &self.wishlist,
        }
    }
}

fn not_found(shelf: Shelf, identifier: &str) -> StoreError {
    StoreError::NotFound {
        shelf,
        identifier: identifier.to_string(),
    }
}

fn load_shelf<C: Catalog + ?Sized>(
    path: &Path,
    catalog: &C,
) -> Result<BTreeMap<String, Record>, StoreError> {
    let mut set = BTreeMap::new();

    for entry in read_entries(path)? {
        let record = Record::fetch(catalog, &entry.identifier, entry.rating)?;
        if set.contains_key(record.identifier()) {
            warn!("Duplicate entry {} in {}", record.identifier(), path.display());
            continue;
        }
        set.insert(record.identifier().to_string(), record);
    }

    Ok(set)
}

fn entries(set: &BTreeMap<String, Record>) -> Vec<StoredEntry> {
    set.values()
        .map(|record| StoredEntry {
            identifier: record.identifier().to_string(),
            rating: record.rating(),
        })
        .collect()
}
