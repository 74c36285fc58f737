#![allow(clippy::uninlined_format_args)]

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use crate_digger::cli::Cli;
use crate_digger::commands;
use crate_digger::config::Config;
use crate_digger::spotify::SpotifyCatalog;
use crate_digger::Collection;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = Config::load(&cli.config)?;
    let catalog = SpotifyCatalog::new(&config.spotify);

    let mut collection = Collection::open(config.library_path(), config.wishlist_path(), &catalog)
        .context("Failed to load the collection")?;
    let (library_path, wishlist_path) = collection.paths();
    debug!(
        "Using {} and {}",
        library_path.display(),
        wishlist_path.display()
    );

    let changed = commands::run(cli.command, &mut collection, &catalog)?;

    // Saving is the session's shutdown step.
    if changed {
        collection.save().context("Failed to save the collection")?;
        info!("Collection saved");
    }

    Ok(())
}
