//! Read-only views over a snapshot of a shelf: orderings and statistics.

use std::cmp::Ordering;
use std::collections::HashMap;

use clap::ValueEnum;

use crate::rating::Rating;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Artist,
    Album,
    /// Highest first, unrated last.
    Rating,
}

/// Returns the records ordered by `key`. Ties fall back to artist then title.
pub fn sorted<'a>(records: impl IntoIterator<Item = &'a Record>, key: SortKey) -> Vec<&'a Record> {
    let mut records: Vec<&Record> = records.into_iter().collect();
    records.sort_by(|a, b| match key {
        SortKey::Artist => by_artist(a, b),
        SortKey::Album => a.title.cmp(&b.title).then_with(|| by_artist(a, b)),
        SortKey::Rating => b.rating().cmp(&a.rating()).then_with(|| by_artist(a, b)),
    });
    records
}

fn by_artist(a: &Record, b: &Record) -> Ordering {
    a.artist
        .cmp(&b.artist)
        .then_with(|| a.title.cmp(&b.title))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats<'a> {
    pub library_count: usize,
    pub wishlist_count: usize,
    pub unrated_count: usize,
    pub average_rating: Option<f32>,
    /// Albums per half-star step, index 0 is 0.0 and index 10 is 5.0.
    pub histogram: [usize; 11],
    /// Album count per artist, most albums first.
    pub top_artists: Vec<(&'a str, usize)>,
    pub top_rated: Vec<&'a Record>,
}

impl<'a> Stats<'a> {
    pub fn new(
        library: impl IntoIterator<Item = &'a Record>,
        wishlist_count: usize,
        top: usize,
    ) -> Self {
        let library: Vec<&Record> = library.into_iter().collect();
        let ratings: Vec<Rating> = library.iter().filter_map(|r| r.rating()).collect();

        let mut histogram = [0usize; 11];
        for rating in &ratings {
            histogram[usize::from(rating.halves())] += 1;
        }

        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().map(Rating::as_f32).sum::<f32>() / ratings.len() as f32)
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &library {
            *counts.entry(record.artist.as_str()).or_default() += 1;
        }
        let mut top_artists: Vec<(&str, usize)> = counts.into_iter().collect();
        top_artists.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        top_artists.truncate(top);

        let mut top_rated: Vec<&Record> = sorted(library.iter().copied(), SortKey::Rating)
            .into_iter()
            .filter(|r| r.rating().is_some())
            .collect();
        top_rated.truncate(top);

        Stats {
            library_count: library.len(),
            wishlist_count,
            unrated_count: library.len() - ratings.len(),
            average_rating,
            histogram,
            top_artists,
            top_rated,
        }
    }

    pub fn total(&self) -> usize {
        self.library_count + self.wishlist_count
    }
}
