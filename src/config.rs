use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::Deserialize;

pub const LIBRARY_FILE: &str = "library.json";
pub const WISHLIST_FILE: &str = "wishlist.json";

const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding `library.json` and `wishlist.json`.
    pub data_dir: PathBuf,
    pub spotify: SpotifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            spotify: SpotifyConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub market: Option<String>,
}

impl Config {
    /// Reads the TOML file at `path`, falling back to defaults when it does not exist.
    /// Credentials from the environment take precedence over the file.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config TOML {}", path.display()))?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(CLIENT_ID_VAR).filter(|v| !v.is_empty()) {
            self.spotify.client_id = id;
        }
        if let Some(secret) = lookup(CLIENT_SECRET_VAR).filter(|v| !v.is_empty()) {
            self.spotify.client_secret = secret;
        }
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(LIBRARY_FILE)
    }

    pub fn wishlist_path(&self) -> PathBuf {
        self.data_dir.join(WISHLIST_FILE)
    }
}
