use crate::catalog::{ALBUM_URI_PREFIX, CatalogError, album_uri};

const LINK_MARKER: &str = "album/";

/// Turns what a user pastes into an album identifier.
///
/// Accepts a share link (`https://open.spotify.com/album/<id>?si=...`), a bare id,
/// or a catalog URI, which is passed through untouched.
pub fn album_identifier(input: &str) -> Result<String, CatalogError> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        let start = input
            .find(LINK_MARKER)
            .map(|idx| idx + LINK_MARKER.len())
            .ok_or_else(|| CatalogError::InvalidIdentifier(input.to_string()))?;
        let rest = &input[start..];
        let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());
        return album_uri(&rest[..end])
            .map_err(|_| CatalogError::InvalidIdentifier(input.to_string()));
    }

    if input.contains(':') {
        return Ok(input.to_string());
    }

    album_uri(input)
}

/// Shortens `spotify:album:<id>` to `<id>` for display.
pub fn short_identifier(identifier: &str) -> &str {
    identifier.strip_prefix(ALBUM_URI_PREFIX).unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_link_is_reduced_to_uri() {
        assert_eq!(
            album_identifier("https://open.spotify.com/album/1bt6q2SruMsBtcerNVtpZB?si=aBcD")
                .unwrap(),
            "spotify:album:1bt6q2SruMsBtcerNVtpZB"
        );
        assert_eq!(
            album_identifier("https://open.spotify.com/intl-de/album/1bt6q2SruMsBtcerNVtpZB")
                .unwrap(),
            "spotify:album:1bt6q2SruMsBtcerNVtpZB"
        );
    }

    #[test]
    fn uri_and_bare_id() {
        assert_eq!(
            album_identifier(" spotify:album:1bt6q2SruMsBtcerNVtpZB ").unwrap(),
            "spotify:album:1bt6q2SruMsBtcerNVtpZB"
        );
        assert_eq!(
            album_identifier("1bt6q2SruMsBtcerNVtpZB").unwrap(),
            "spotify:album:1bt6q2SruMsBtcerNVtpZB"
        );
    }

    #[test]
    fn rejects_links_without_album() {
        assert!(album_identifier("https://open.spotify.com/track/abc?si=1").is_err());
        assert!(album_identifier("not an id").is_err());
    }

    #[test]
    fn shortens_uri() {
        assert_eq!(short_identifier("spotify:album:abc"), "abc");
        assert_eq!(short_identifier("cat:album:X"), "cat:album:X");
    }
}
