// Clap definitions in derive style

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::rating::Rating;
use crate::report::SortKey;

#[derive(Parser)]
#[command(name = "crate-digger", version, about)]
pub struct Cli {
    /// Increase verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Path to the config TOML file
    #[arg(short, long, default_value = "crate-digger.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Albums you own, with their ratings
    #[command(subcommand)]
    Library(LibraryCommand),

    /// Albums you still want to get
    #[command(subcommand)]
    Wishlist(WishlistCommand),

    /// Counts, ratings and top artists of the library
    Stats {
        /// How many artists and albums to list
        #[arg(short = 'n', long = "top", default_value_t = 10)]
        top: usize,
    },

    /// Empty both the library and the wishlist
    ClearAll {
        /// Confirm the operation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LibraryCommand {
    /// Add an album, taking it off the wishlist if it was there
    Add {
        /// Album URI or share link
        #[arg(value_name = "ALBUM")]
        album: String,

        /// Rating from 0 to 5 in steps of 0.5
        #[arg(short, long)]
        rating: Rating,
    },

    /// Change the rating of an owned album
    Rate {
        #[arg(value_name = "ALBUM")]
        album: String,

        #[arg(value_name = "RATING")]
        rating: Rating,
    },

    /// Remove an owned album
    Remove {
        #[arg(value_name = "ALBUM")]
        album: String,
    },

    /// List owned albums
    List {
        #[arg(short, long, value_enum, default_value_t = SortKey::Artist)]
        sort: SortKey,
    },

    /// Remove every owned album
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Add an album to the wishlist
    Add {
        #[arg(value_name = "ALBUM")]
        album: String,
    },

    /// Move a wishlisted album into the library
    Move {
        #[arg(value_name = "ALBUM")]
        album: String,

        #[arg(short, long)]
        rating: Rating,
    },

    /// Remove an album from the wishlist
    Remove {
        #[arg(value_name = "ALBUM")]
        album: String,
    },

    /// List wishlisted albums
    List,

    /// Remove every wishlisted album
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_library_add() {
        let cli = Cli::try_parse_from([
            "crate-digger",
            "-vv",
            "library",
            "add",
            "spotify:album:abc",
            "--rating",
            "4.5",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        match cli.command {
            Commands::Library(LibraryCommand::Add { album, rating }) => {
                assert_eq!(album, "spotify:album:abc");
                assert_eq!(rating, Rating::new(4.5).unwrap());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn rejects_invalid_rating() {
        assert!(
            Cli::try_parse_from(["crate-digger", "library", "rate", "spotify:album:abc", "4.2"])
                .is_err()
        );
    }

    #[test]
    fn parses_sort_key() {
        let cli =
            Cli::try_parse_from(["crate-digger", "library", "list", "--sort", "rating"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Library(LibraryCommand::List { sort: SortKey::Rating })
        ));
    }
}
