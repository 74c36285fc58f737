use anyhow::{Context, bail};

use crate::cli::{Commands, LibraryCommand, WishlistCommand};
use crate::report::{self, SortKey, Stats};
use crate::utils::{album_identifier, short_identifier};
use crate::{Catalog, Collection, Record, Shelf};

/// Runs one command against the collection. Returns whether it changed anything.
pub fn run(
    command: Commands,
    collection: &mut Collection,
    catalog: &impl Catalog,
) -> anyhow::Result<bool> {
    match command {
        Commands::Library(command) => library(command, collection, catalog),
        Commands::Wishlist(command) => wishlist(command, collection, catalog),
        Commands::Stats { top } => {
            print_stats(&Stats::new(
                collection.library(),
                collection.len(Shelf::Wishlist),
                top,
            ));
            Ok(false)
        }
        Commands::ClearAll { yes } => {
            confirm(yes, "clear the library and the wishlist")?;
            collection.clear_all();
            println!("Library and wishlist cleared.");
            Ok(true)
        }
    }
}

fn library(
    command: LibraryCommand,
    collection: &mut Collection,
    catalog: &impl Catalog,
) -> anyhow::Result<bool> {
    match command {
        LibraryCommand::Add { album, rating } => {
            let identifier = album_identifier(&album)?;
            let record = Record::fetch(catalog, &identifier, Some(rating))
                .with_context(|| format!("Error adding album {}", album))?;
            println!("Added '{}' by {} to library!", record.title, record.artist);
            collection.add_to_library(record, rating);
            Ok(true)
        }
        LibraryCommand::Rate { album, rating } => {
            let identifier = album_identifier(&album)?;
            collection.rate_in_library(&identifier, rating)?;
            println!("Rated {} at {}/5", short_identifier(&identifier), rating);
            Ok(true)
        }
        LibraryCommand::Remove { album } => {
            let identifier = album_identifier(&album)?;
            let record = collection.remove_from_library(&identifier)?;
            println!("Removed '{}' by {} from library.", record.title, record.artist);
            Ok(true)
        }
        LibraryCommand::List { sort } => {
            print_shelf(collection, Shelf::Library, sort);
            Ok(false)
        }
        LibraryCommand::Clear { yes } => {
            confirm(yes, "clear the library")?;
            collection.clear_library();
            println!("Library cleared!");
            Ok(true)
        }
    }
}

fn wishlist(
    command: WishlistCommand,
    collection: &mut Collection,
    catalog: &impl Catalog,
) -> anyhow::Result<bool> {
    match command {
        WishlistCommand::Add { album } => {
            let identifier = album_identifier(&album)?;
            let record = Record::fetch(catalog, &identifier, None)
                .with_context(|| format!("Error adding album {}", album))?;
            let (title, artist) = (record.title.clone(), record.artist.clone());
            if collection.add_to_wishlist(record)? {
                println!("Added '{}' by {} to wishlist!", title, artist);
                Ok(true)
            } else {
                println!("'{}' by {} is already on the wishlist.", title, artist);
                Ok(false)
            }
        }
        WishlistCommand::Move { album, rating } => {
            let identifier = album_identifier(&album)?;
            collection.move_to_library(&identifier, rating)?;
            println!("Moved {} to library!", short_identifier(&identifier));
            Ok(true)
        }
        WishlistCommand::Remove { album } => {
            let identifier = album_identifier(&album)?;
            let record = collection.remove_from_wishlist(&identifier)?;
            println!("Removed '{}' by {} from wishlist.", record.title, record.artist);
            Ok(true)
        }
        WishlistCommand::List => {
            print_shelf(collection, Shelf::Wishlist, SortKey::Artist);
            Ok(false)
        }
        WishlistCommand::Clear { yes } => {
            confirm(yes, "clear the wishlist")?;
            collection.clear_wishlist();
            println!("Wishlist cleared!");
            Ok(true)
        }
    }
}

fn confirm(yes: bool, action: &str) -> anyhow::Result<()> {
    if !yes {
        bail!("Refusing to {} without --yes", action);
    }
    Ok(())
}

fn print_shelf(collection: &Collection, shelf: Shelf, sort: SortKey) {
    let records = report::sorted(collection.shelf(shelf), sort);
    if records.is_empty() {
        println!("Your {} is empty. Add some albums!", shelf);
        return;
    }

    println!("Your {} ({} albums)", shelf, records.len());
    for record in records {
        let rating = match (shelf, record.rating()) {
            (Shelf::Wishlist, _) => String::new(),
            (Shelf::Library, Some(rating)) => format!("  {}/5", rating),
            (Shelf::Library, None) => "  unrated".to_string(),
        };
        println!(
            "  {} - {}{}  [{}]",
            record.artist,
            record.title,
            rating,
            short_identifier(record.identifier())
        );
    }
}

fn print_stats(stats: &Stats) {
    println!("Library albums:  {}", stats.library_count);
    println!("Wishlist albums: {}", stats.wishlist_count);
    println!("Total albums:    {}", stats.total());

    if stats.library_count == 0 {
        println!("Add some albums to your library to see statistics!");
        return;
    }

    match stats.average_rating {
        Some(average) => println!("Average rating:  {:.1}/5", average),
        None => println!("No albums have been rated yet"),
    }
    if stats.unrated_count > 0 {
        println!("{} albums are unrated", stats.unrated_count);
    }

    println!("\nRating distribution");
    for (halves, count) in stats.histogram.iter().enumerate().filter(|(_, c)| **c > 0) {
        println!("  {:>3.1}  {}", halves as f32 / 2.0, "#".repeat(*count));
    }

    println!("\nTop artists");
    for (artist, count) in &stats.top_artists {
        println!("  {:<30} {}", artist, count);
    }

    if !stats.top_rated.is_empty() {
        println!("\nHighest rated albums");
        for (i, record) in stats.top_rated.iter().enumerate() {
            if let Some(rating) = record.rating() {
                println!("  #{}. {} by {}  {}/5", i + 1, record.title, record.artist, rating);
            }
        }
    }
}
