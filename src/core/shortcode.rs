//! Shortcode scanning and replacement
//!
//! A shortcode is a marker such as `[[WBR:all ignore:2,6]]` embedded in free
//! text. [`expand`] finds every marker for the registered names, parses its
//! `key:value` parameters and splices in whatever the matching handler
//! returns. Markers with malformed parameters are left untouched and the rest
//! of the text is still expanded.

use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

pub type ShortcodeParams = BTreeMap<String, String>;

/// A handler receives the marker's parameters and returns replacement text.
pub type ShortcodeHandler<'a> = &'a dyn Fn(&ShortcodeParams) -> String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A parameter token without a `:` separator.
    MalformedShortcodeToken { token: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MalformedShortcodeToken { token } => {
                write!(f, "Invalid shortcode parameter '{token}'. Use key:value.")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Shortcodes this crate knows how to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcodeKind {
    /// The complete roster, grouped by rank.
    All,
}

pub struct Shortcode {
    pub kind: ShortcodeKind,
    pub name: &'static str,
    pub help: &'static str,
}

const SHORTCODES: &[Shortcode] = &[Shortcode {
    kind: ShortcodeKind::All,
    name: "all",
    help: "Render the complete roster. Optional ignore:<r1,r2> overrides the ignored ranks.",
}];

pub fn all_shortcodes() -> &'static [Shortcode] {
    SHORTCODES
}

/// Split the inside of a marker into `key:value` parameters.
///
/// Keys are lower-cased; keys and values are trimmed. A later duplicate key
/// wins.
pub fn parse_parameters(inner: &str) -> Result<ShortcodeParams, RenderError> {
    let mut params = ShortcodeParams::new();
    for token in inner.split_whitespace() {
        let Some((key, value)) = token.split_once(':') else {
            return Err(RenderError::MalformedShortcodeToken {
                token: token.to_string(),
            });
        };
        params.insert(key.trim().to_lowercase(), value.trim().to_string());
    }
    Ok(params)
}

/// Expand every marker in `text` whose name has a handler.
pub fn expand(
    text: &str,
    prefix: &str,
    suffix: &str,
    handlers: &[(&str, ShortcodeHandler<'_>)],
) -> String {
    expand_collecting(text, prefix, suffix, handlers).0
}

/// Like [`expand`], also returning the errors for markers left untouched.
pub fn expand_collecting(
    text: &str,
    prefix: &str,
    suffix: &str,
    handlers: &[(&str, ShortcodeHandler<'_>)],
) -> (String, Vec<RenderError>) {
    let mut content = text.to_string();
    let mut errors = Vec::new();
    for (name, handler) in handlers {
        let marker = format!("{prefix}{name}");
        replace_markers(&mut content, &marker, suffix, *handler, &mut errors);
    }
    (content, errors)
}

enum ScanState {
    Searching { from: usize },
    FoundStart { start: usize },
    Replacing { start: usize, end: usize, params: ShortcodeParams },
}

fn replace_markers(
    content: &mut String,
    marker: &str,
    suffix: &str,
    handler: ShortcodeHandler<'_>,
    errors: &mut Vec<RenderError>,
) {
    let mut state = ScanState::Searching { from: 0 };
    loop {
        state = match state {
            ScanState::Searching { from } => match find_marker(content, marker, suffix, from) {
                Some(start) => ScanState::FoundStart { start },
                None => return,
            },
            ScanState::FoundStart { start } => {
                let inner_start = start + marker.len();
                match find_ignore_ascii_case(content, suffix, inner_start) {
                    None => ScanState::Searching { from: start + 1 },
                    Some(end) => match parse_parameters(&content[inner_start..end]) {
                        Ok(params) => ScanState::Replacing { start, end, params },
                        Err(err) => {
                            warn!(marker, error = %err, "leaving shortcode unexpanded");
                            errors.push(err);
                            ScanState::Searching { from: start + 1 }
                        }
                    },
                }
            }
            ScanState::Replacing { start, end, params } => {
                let rendered = handler(&params);
                content.replace_range(start..end + suffix.len(), &rendered);
                // Resume one byte past the splice start. Output that itself
                // starts with the marker is therefore not re-expanded in place.
                ScanState::Searching { from: start + 1 }
            }
        };
    }
}

/// Find the next `marker` at or after `from` that is followed by whitespace
/// or the suffix, so `[[WBR:all` does not match `[[WBR:allies]]`.
fn find_marker(content: &str, marker: &str, suffix: &str, from: usize) -> Option<usize> {
    let mut from = from;
    while let Some(start) = find_ignore_ascii_case(content, marker, from) {
        let rest = &content.as_bytes()[start + marker.len()..];
        let terminated = rest.is_empty()
            || rest[0].is_ascii_whitespace()
            || starts_with_ignore_ascii_case(rest, suffix.as_bytes());
        if terminated {
            return Some(start);
        }
        from = start + 1;
    }
    None
}

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from >= haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&index| haystack[index..index + needle.len()].eq_ignore_ascii_case(needle))
}
