use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::rating::Rating;

/// One line of a collection file. Display fields are never stored,
/// they are looked up again on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Files written before the structured format hold `identifier` or `identifier/rating` strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Structured(StoredEntry),
    Legacy(String),
}

/// Reads a collection file. A missing or empty file is an empty collection.
pub fn read_entries(path: &Path) -> Result<Vec<StoredEntry>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        debug!("{} is empty", path.display());
        return Ok(Vec::new());
    }

    let raw: Vec<RawEntry> = serde_json::from_str(&content).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    raw.into_iter()
        .map(|entry| match entry {
            RawEntry::Structured(entry) => Ok(entry),
            RawEntry::Legacy(text) => {
                warn!("Legacy entry in {}: {}", path.display(), text);
                parse_legacy(&text).map_err(|source| StoreError::InvalidEntry {
                    path: path.to_path_buf(),
                    entry: text.clone(),
                    source,
                })
            }
        })
        .collect()
}

/// Splits `identifier/rating` on the last `/`, but only when what follows is a number.
/// Older front ends rated in tenths, so off-step values are rounded to the nearest half star.
fn parse_legacy(text: &str) -> Result<StoredEntry, crate::rating::RatingError> {
    if let Some((identifier, rating)) = text.rsplit_once('/')
        && let Ok(value) = rating.trim().parse::<f32>()
    {
        let snapped = Rating::nearest(value)?;
        if snapped.as_f32() != value {
            warn!("Rounded rating {} of {} to {}", value, identifier, snapped);
        }

        return Ok(StoredEntry {
            identifier: identifier.to_string(),
            rating: Some(snapped),
        });
    }

    Ok(StoredEntry {
        identifier: text.to_string(),
        rating: None,
    })
}

/// Writes a collection file through a sibling temporary file, so a crash
/// leaves either the old or the new content, never half of one.
pub fn write_entries(path: &Path, entries: &[StoredEntry]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    debug!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(identifier: &str, rating: Option<f32>) -> StoredEntry {
        StoredEntry {
            identifier: identifier.to_string(),
            rating: rating.map(|r| Rating::new(r).unwrap()),
        }
    }

    #[test]
    fn missing_and_empty_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        assert!(read_entries(&path).unwrap().is_empty());

        fs::write(&path, "").unwrap();
        assert!(read_entries(&path).unwrap().is_empty());
    }

    #[test]
    fn writes_structured_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");

        write_entries(
            &path,
            &[entry("cat:album:A", Some(4.5)), entry("cat:album:B", None)],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "identifier": "cat:album:A", "rating": 4.5 },
                { "identifier": "cat:album:B" }
            ])
        );
        assert!(content.contains('\n'));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn reads_legacy_strings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            r#"[
    "spotify:album:abc/4.0",
    "spotify:album:def",
    { "identifier": "spotify:album:ghi", "rating": 2.5 }
]"#,
        )
        .unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                entry("spotify:album:abc", Some(4.0)),
                entry("spotify:album:def", None),
                entry("spotify:album:ghi", Some(2.5)),
            ]
        );
    }

    #[test]
    fn legacy_tenths_are_rounded_to_half_stars() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"["cat:album:A/4.5", "cat:album:B/3.7", "cat:album:C/0.1"]"#).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                entry("cat:album:A", Some(4.5)),
                entry("cat:album:B", Some(3.5)),
                entry("cat:album:C", Some(0.0)),
            ]
        );
    }

    #[test]
    fn legacy_split_only_on_numeric_suffix() {
        assert_eq!(parse_legacy("a/b:c").unwrap(), entry("a/b:c", None));
        assert_eq!(parse_legacy("a/b/3.5").unwrap(), entry("a/b", Some(3.5)));
    }

    #[test]
    fn invalid_legacy_rating_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"["spotify:album:abc/9.0"]"#).unwrap();

        assert!(matches!(
            read_entries(&path),
            Err(StoreError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn garbage_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wishlist.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_entries(&path), Err(StoreError::Format { .. })));
    }
}
