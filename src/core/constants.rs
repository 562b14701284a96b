//! Shared constants used across the application

/// Case-insensitive opening of every shortcode marker, e.g. `[[WBR:all]]`.
pub const SHORTCODE_PREFIX: &str = "[[WBR:";

/// Closing of every shortcode marker.
pub const SHORTCODE_SUFFIX: &str = "]]";

/// Tag used in the HTML comments that replace failed markers.
pub const ERROR_COMMENT_TAG: &str = "bnet-roster";
