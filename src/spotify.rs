use std::cell::RefCell;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Deserialize;

use crate::catalog::{AlbumInfo, Catalog, CatalogError, album_id};
use crate::config::SpotifyConfig;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_URL: &str = "https://api.spotify.com/v1";

/// Tokens are refreshed this long before Spotify says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<NamedObject>,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct NamedObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Album lookups against the Spotify Web API, authenticated with the client-credentials grant.
pub struct SpotifyCatalog {
    agent: ureq::Agent,
    client_id: String,
    client_secret: String,
    market: Option<String>,
    token: RefCell<Option<AccessToken>>,
}

impl SpotifyCatalog {
    pub fn new(config: &SpotifyConfig) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            market: config.market.clone(),
            token: RefCell::new(None),
        }
    }

    /// Returns a valid bearer token, requesting a new one when the cached one is stale.
    fn bearer(&self) -> Result<String, CatalogError> {
        if let Some(token) = self.token.borrow().as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            warn!("Spotify credentials are not configured");
            return Err(CatalogError::Unauthorized);
        }

        debug!("Requesting a new Spotify access token");
        let response = self
            .agent
            .post(TOKEN_URL)
            .send_form([
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .map_err(|e| map_transport_error(e, TOKEN_URL))?;

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| CatalogError::Unreachable(e.to_string()))?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        let value = token.access_token;
        *self.token.borrow_mut() = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    fn album_url(&self, id: &str) -> String {
        match &self.market {
            Some(market) => format!(
                "{}/albums/{}?market={}",
                API_URL,
                id,
                urlencoding::encode(market)
            ),
            None => format!("{}/albums/{}", API_URL, id),
        }
    }
}

impl Catalog for SpotifyCatalog {
    fn album(&self, identifier: &str) -> Result<AlbumInfo, CatalogError> {
        let id = album_id(identifier)?;
        let url = self.album_url(id);
        let bearer = self.bearer()?;

        debug!("Looking up album {}", id);
        let response = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", bearer))
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(400 | 404) => {
                    CatalogError::InvalidIdentifier(identifier.to_string())
                }
                other => map_transport_error(other, &url),
            })?;

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| CatalogError::Unreachable(e.to_string()))?;

        album_from_json(&body)
    }
}

fn map_transport_error(error: ureq::Error, url: &str) -> CatalogError {
    match error {
        ureq::Error::StatusCode(400 | 401 | 403) => CatalogError::Unauthorized,
        ureq::Error::StatusCode(code) => {
            CatalogError::Unreachable(format!("{} answered with status {}", url, code))
        }
        other => CatalogError::Unreachable(other.to_string()),
    }
}

/// Picks the fields we keep out of a `GET /albums/{id}` payload.
fn album_from_json(body: &str) -> Result<AlbumInfo, CatalogError> {
    let album: AlbumResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let artist = album
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .ok_or_else(|| CatalogError::Malformed(format!("album {} has no artist", album.uri)))?;

    // Images come largest first.
    let cover_url = album
        .images
        .into_iter()
        .next()
        .map(|i| i.url)
        .unwrap_or_default();

    Ok(AlbumInfo {
        identifier: album.uri,
        title: album.name,
        artist,
        cover_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUM_JSON: &str = r#"{
        "album_type": "album",
        "uri": "spotify:album:4aawyAB9vmqN3uQ7FjRGTy",
        "name": "Global Warming (Deluxe Version)",
        "artists": [
            { "name": "Pitbull", "uri": "spotify:artist:0TnOYISbd1XYRBk9myaseg" },
            { "name": "Someone Else" }
        ],
        "images": [
            { "url": "https://i.scdn.co/image/large", "height": 640, "width": 640 },
            { "url": "https://i.scdn.co/image/small", "height": 64, "width": 64 }
        ]
    }"#;

    #[test]
    fn parses_album_payload() {
        let info = album_from_json(ALBUM_JSON).unwrap();
        assert_eq!(info.identifier, "spotify:album:4aawyAB9vmqN3uQ7FjRGTy");
        assert_eq!(info.title, "Global Warming (Deluxe Version)");
        assert_eq!(info.artist, "Pitbull");
        assert_eq!(info.cover_url, "https://i.scdn.co/image/large");
    }

    #[test]
    fn album_without_artist_is_malformed() {
        let body = r#"{ "uri": "spotify:album:x", "name": "X", "artists": [], "images": [] }"#;
        assert!(matches!(album_from_json(body), Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn album_without_images_has_empty_cover() {
        let body = r#"{ "uri": "spotify:album:x", "name": "X", "artists": [{ "name": "A" }] }"#;
        assert_eq!(album_from_json(body).unwrap().cover_url, "");
    }

    #[test]
    fn album_url_carries_market() {
        let config = SpotifyConfig {
            market: Some("GB".to_string()),
            ..Default::default()
        };
        let catalog = SpotifyCatalog::new(&config);
        assert_eq!(
            catalog.album_url("abc"),
            "https://api.spotify.com/v1/albums/abc?market=GB"
        );
    }

    #[test]
    fn missing_credentials_are_unauthorized() {
        let catalog = SpotifyCatalog::new(&SpotifyConfig::default());
        assert!(matches!(
            catalog.album("spotify:album:abc"),
            Err(CatalogError::Unauthorized)
        ));
    }
}
