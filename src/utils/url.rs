//! URL utilities for consistent URL handling
//!
//! This module provides utilities for normalizing URLs to prevent issues
//! with trailing slashes when joining configured base URLs with paths.

use reqwest::Url;

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use bnet_roster::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://render.example.com/eu/"), "https://render.example.com/eu");
/// assert_eq!(normalize_base_url("https://render.example.com/eu///"), "https://render.example.com/eu");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and a relative path with exactly one slash between them
///
/// # Examples
///
/// ```
/// use bnet_roster::utils::url::join_url;
///
/// assert_eq!(
///     join_url("https://render.example.com/eu/", "thrall/1/2-avatar.jpg"),
///     "https://render.example.com/eu/thrall/1/2-avatar.jpg"
/// );
/// ```
pub fn join_url(base_url: &str, path: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{}/{}", normalized_base, path)
}

/// Armory profile link: `<base>/<server lowercased>/<name>/advanced`, with
/// both segments percent-encoded.
pub fn armory_profile_url(base: &Url, server: &str, name: &str) -> String {
    let mut url = base.clone();
    let server = server.to_lowercase();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend([server.as_str(), name, "advanced"]);
    }
    url.to_string()
}

/// Parse a configured base URL, naming the offending key on failure.
pub fn parse_base_url(value: &str) -> Result<Url, String> {
    Url::parse(value.trim()).map_err(|err| format!("'{value}' is not a valid URL: {err}"))
}
