use crate::core::config::data::Config;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_API_HOST: &str = "https://eu.api.battle.net/";
pub const DEFAULT_ARMORY_HOST: &str = "http://eu.battle.net/wow/en/character/";
pub const DEFAULT_RENDER_PATH: &str = "http://render-api-eu.worldofwarcraft.com/static-render/eu/";
pub const DEFAULT_LOCALE: &str = "en_GB";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "BNET_API_KEY";

impl Config {
    pub fn language(&self) -> &str {
        non_empty(&self.default_language).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn api_host(&self) -> &str {
        non_empty(&self.api_host).unwrap_or(DEFAULT_API_HOST)
    }

    pub fn armory_host(&self) -> &str {
        non_empty(&self.armory_host).unwrap_or(DEFAULT_ARMORY_HOST)
    }

    pub fn render_path(&self) -> &str {
        non_empty(&self.render_path).unwrap_or(DEFAULT_RENDER_PATH)
    }

    pub fn locale(&self) -> &str {
        non_empty(&self.locale).unwrap_or(DEFAULT_LOCALE)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn bind(&self) -> &str {
        non_empty(&self.bind).unwrap_or(DEFAULT_BIND)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
