use crate::api::RosterRequest;
use crate::core::config::data::{Config, LabelOverrides};
use crate::core::config::defaults::API_KEY_ENV;
use crate::core::config::io::ConfigError;
use crate::core::render::RenderLinks;
use crate::core::roster::parse_ignored_ranks;
use crate::utils::url::parse_base_url;
use reqwest::Url;
use std::collections::BTreeSet;
use std::time::Duration;

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub guild: Option<String>,
    pub locale: Option<String>,
    pub ignore_ranks: Option<String>,
    pub bind: Option<String>,
}

/// Where the API key in effect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    ConfigFile,
    Environment,
    Unset,
}

impl ApiKeySource {
    pub fn describe(self) -> &'static str {
        match self {
            ApiKeySource::ConfigFile => "config file",
            ApiKeySource::Environment => API_KEY_ENV,
            ApiKeySource::Unset => "unset",
        }
    }
}

/// The config file with command-line flags and the environment applied.
///
/// Empty flag values count as absent, so `--server ""` keeps the file value.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: Config,
    pub api_key_source: ApiKeySource,
}

impl EffectiveConfig {
    pub fn merge(
        config: &Config,
        overrides: &ConfigOverrides,
        env_api_key: Option<String>,
    ) -> EffectiveConfig {
        let mut merged = config.clone();
        apply(&mut merged.server, &overrides.server);
        apply(&mut merged.guild, &overrides.guild);
        apply(&mut merged.locale, &overrides.locale);
        apply(&mut merged.ignore_ranks, &overrides.ignore_ranks);
        apply(&mut merged.bind, &overrides.bind);

        let file_key = non_blank(&config.api_key);
        let env_key = non_blank(&env_api_key);
        let api_key_source = match (file_key, env_key) {
            (Some(_), _) => ApiKeySource::ConfigFile,
            (None, Some(_)) => ApiKeySource::Environment,
            (None, None) => ApiKeySource::Unset,
        };
        merged.api_key = file_key.or(env_key).map(str::to_string);

        EffectiveConfig {
            config: merged,
            api_key_source,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn apply(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = non_blank(value) {
        *target = Some(value.to_string());
    }
}

/// Fully resolved, immutable runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub language: String,
    pub api_host: String,
    pub armory_host: Url,
    pub render_path: String,
    pub api_key: String,
    pub server: String,
    pub guild: String,
    pub locale: String,
    pub ignored_ranks: BTreeSet<u32>,
    pub timeout: Duration,
    pub bind: String,
    pub labels: LabelOverrides,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        overrides: &ConfigOverrides,
        env_api_key: Option<String>,
    ) -> Result<Settings, ConfigError> {
        let effective = EffectiveConfig::merge(config, overrides, env_api_key);
        let config = &effective.config;

        let server = required("server", config.server.as_ref())?;
        let guild = required("guild", config.guild.as_ref())?;
        let api_key = required("api_key", config.api_key.as_ref())?;
        let locale = config.locale().to_string();

        let ignored_ranks = parse_ignored_ranks(config.ignore_ranks.as_deref().unwrap_or(""))
            .map_err(|reason| ConfigError::Invalid {
                key: "ignore_ranks",
                reason,
            })?;

        let timeout_secs = config.timeout_secs();
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }

        let api_host = parse_base_url(config.api_host())
            .map_err(|reason| ConfigError::Invalid {
                key: "api_host",
                reason,
            })?
            .to_string();
        let armory_host =
            parse_base_url(config.armory_host()).map_err(|reason| ConfigError::Invalid {
                key: "armory_host",
                reason,
            })?;
        let render_path = parse_base_url(config.render_path())
            .map_err(|reason| ConfigError::Invalid {
                key: "render_path",
                reason,
            })?
            .to_string();

        Ok(Settings {
            language: config.language().to_lowercase(),
            api_host,
            armory_host,
            render_path,
            api_key,
            server,
            guild,
            locale,
            ignored_ranks,
            timeout: Duration::from_secs(timeout_secs),
            bind: config.bind().to_string(),
            labels: config.labels.clone(),
        })
    }

    pub fn roster_request(&self) -> RosterRequest {
        RosterRequest {
            api_host: self.api_host.clone(),
            server: self.server.clone(),
            guild: self.guild.clone(),
            locale: self.locale.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout,
        }
    }

    pub fn render_links(&self) -> RenderLinks {
        RenderLinks {
            thumbnail_base_url: self.render_path.clone(),
            armory_base_url: self.armory_host.clone(),
            server: self.server.clone(),
        }
    }
}

fn required(key: &'static str, value: Option<&String>) -> Result<String, ConfigError> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            reason: "not set".to_string(),
        })
}
