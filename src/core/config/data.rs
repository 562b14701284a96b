use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-category label overrides, merged over the built-in tables.
///
/// Numeric categories are keyed by the API code written as a string
/// (`"3" = "Raider"`); roles are keyed by `TANK`, `HEALING`, `DPS`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct LabelOverrides {
    #[serde(default)]
    pub class: BTreeMap<String, String>,
    #[serde(default)]
    pub race: BTreeMap<String, String>,
    #[serde(default)]
    pub rank: BTreeMap<String, String>,
    #[serde(default)]
    pub role: BTreeMap<String, String>,
}

impl LabelOverrides {
    pub fn is_empty(&self) -> bool {
        self.class.is_empty() && self.race.is_empty() && self.rank.is_empty() && self.role.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Language of the built-in label tables ("en" or "de")
    pub default_language: Option<String>,
    /// Base URL of the roster API, e.g. https://eu.api.battle.net/
    pub api_host: Option<String>,
    /// Base URL of the armory character pages
    pub armory_host: Option<String>,
    /// Base URL prepended to character thumbnail paths
    pub render_path: Option<String>,
    pub api_key: Option<String>,
    pub server: Option<String>,
    pub guild: Option<String>,
    pub locale: Option<String>,
    /// Comma-separated ranks hidden from the output, e.g. "2,6,7"
    pub ignore_ranks: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Listen address for `bnet-roster serve`
    pub bind: Option<String>,
    #[serde(default)]
    pub labels: LabelOverrides,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Mask all but the last four characters of a secret for display.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
