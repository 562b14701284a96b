//! Display labels for the numeric codes in roster data
//!
//! The built-in tables are embedded from builtin_labels.toml at build time.
//! A [`LookupTables`] value is built once per process (or per test) and then
//! shared read-only; nothing here is global.

use crate::api::Role;
use crate::core::config::{ConfigError, LabelOverrides};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct BuiltinLabelSet {
    #[serde(default)]
    class: BTreeMap<String, String>,
    #[serde(default)]
    race: BTreeMap<String, String>,
    #[serde(default)]
    rank: BTreeMap<String, String>,
    #[serde(default)]
    role: BTreeMap<String, String>,
    unknown: UnknownLabels,
}

#[derive(Debug, Clone, Deserialize)]
struct UnknownLabels {
    class: String,
    race: String,
    rank: String,
    role: String,
}

fn load_builtin_label_sets() -> BTreeMap<String, BuiltinLabelSet> {
    const LABELS_CONTENT: &str = include_str!("../builtin_labels.toml");

    toml::from_str(LABELS_CONTENT).expect("Failed to parse builtin_labels.toml")
}

/// Languages with a built-in label set.
pub fn builtin_languages() -> Vec<String> {
    load_builtin_label_sets().into_keys().collect()
}

#[derive(Debug, Clone)]
pub struct LookupTables {
    classes: BTreeMap<u32, String>,
    races: BTreeMap<u32, String>,
    ranks: BTreeMap<u32, String>,
    roles: BTreeMap<Role, String>,
    unknown: UnknownLabels,
}

impl LookupTables {
    /// Built-in tables for `language`, falling back to English when the
    /// language has no label set.
    pub fn builtin(language: &str) -> Self {
        let mut sets = load_builtin_label_sets();
        let language = language.trim().to_lowercase();
        let set = match sets.remove(&language) {
            Some(set) => set,
            None => sets
                .remove(FALLBACK_LANGUAGE)
                .expect("builtin_labels.toml must define the fallback language"),
        };

        LookupTables {
            classes: numeric_keys(set.class),
            races: numeric_keys(set.race),
            ranks: numeric_keys(set.rank),
            roles: role_keys(set.role),
            unknown: set.unknown,
        }
    }

    /// Merge configured labels over the current tables.
    pub fn with_overrides(mut self, overrides: &LabelOverrides) -> Result<Self, ConfigError> {
        merge_numeric(&mut self.classes, &overrides.class, "labels.class")?;
        merge_numeric(&mut self.races, &overrides.race, "labels.race")?;
        merge_numeric(&mut self.ranks, &overrides.rank, "labels.rank")?;
        for (key, label) in &overrides.role {
            let role = Role::from_api(&key.to_uppercase());
            if role == Role::Unknown {
                return Err(ConfigError::Invalid {
                    key: "labels.role",
                    reason: format!("'{key}' is not one of TANK, HEALING, DPS"),
                });
            }
            self.roles.insert(role, label.clone());
        }
        Ok(self)
    }

    pub fn class_label(&self, code: u32) -> &str {
        self.classes
            .get(&code)
            .map_or(self.unknown.class.as_str(), String::as_str)
    }

    pub fn race_label(&self, code: u32) -> &str {
        self.races
            .get(&code)
            .map_or(self.unknown.race.as_str(), String::as_str)
    }

    pub fn rank_label(&self, rank: u32) -> &str {
        self.ranks
            .get(&rank)
            .map_or(self.unknown.rank.as_str(), String::as_str)
    }

    pub fn role_label(&self, role: Role) -> &str {
        self.roles
            .get(&role)
            .map_or(self.unknown.role.as_str(), String::as_str)
    }
}

fn numeric_keys(raw: BTreeMap<String, String>) -> BTreeMap<u32, String> {
    raw.into_iter()
        .filter_map(|(code, label)| code.trim().parse::<u32>().ok().map(|code| (code, label)))
        .collect()
}

fn role_keys(raw: BTreeMap<String, String>) -> BTreeMap<Role, String> {
    raw.into_iter()
        .map(|(key, label)| (Role::from_api(&key), label))
        .filter(|(role, _)| *role != Role::Unknown)
        .collect()
}

fn merge_numeric(
    table: &mut BTreeMap<u32, String>,
    overrides: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<(), ConfigError> {
    for (code, label) in overrides {
        let code = code.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
            key,
            reason: format!("'{code}' is not a numeric code"),
        })?;
        table.insert(code, label.clone());
    }
    Ok(())
}
