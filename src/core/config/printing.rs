use crate::core::config::data::{mask_secret, Config};
use crate::core::config::settings::{ApiKeySource, EffectiveConfig};
use crate::core::constants::{SHORTCODE_PREFIX, SHORTCODE_SUFFIX};
use crate::core::labels::builtin_languages;
use crate::core::shortcode::all_shortcodes;
use std::collections::BTreeMap;
use std::fmt::Write;

impl EffectiveConfig {
    pub fn print_all(&self) {
        print!("{}", self.describe());
    }

    /// The text printed by `bnet-roster config`.
    pub fn describe(&self) -> String {
        self.config.describe_with_key_source(self.api_key_source)
    }
}

impl Config {
    fn describe_with_key_source(&self, key_source: ApiKeySource) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Current configuration:");
        let _ = writeln!(
            out,
            "  default-language: {} (built-in: {})",
            self.language(),
            builtin_languages().join(", ")
        );
        let _ = writeln!(out, "  api-host: {}", self.api_host());
        let _ = writeln!(out, "  armory-host: {}", self.armory_host());
        let _ = writeln!(out, "  render-path: {}", self.render_path());
        match self.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => {
                let _ = writeln!(
                    out,
                    "  api-key: {} (from {})",
                    mask_secret(key),
                    key_source.describe()
                );
            }
            None => {
                let _ = writeln!(out, "  api-key: (unset)");
            }
        }
        for (name, value) in [("server", &self.server), ("guild", &self.guild)] {
            match value {
                Some(value) => {
                    let _ = writeln!(out, "  {name}: {value}");
                }
                None => {
                    let _ = writeln!(out, "  {name}: (unset)");
                }
            }
        }
        let _ = writeln!(out, "  locale: {}", self.locale());
        match self.ignore_ranks.as_deref().filter(|ranks| !ranks.trim().is_empty()) {
            Some(ranks) => {
                let _ = writeln!(out, "  ignore-ranks: {ranks}");
            }
            None => {
                let _ = writeln!(out, "  ignore-ranks: (none)");
            }
        }
        let _ = writeln!(out, "  timeout-secs: {}", self.timeout_secs());
        let _ = writeln!(out, "  bind: {}", self.bind());

        if self.labels.is_empty() {
            let _ = writeln!(out, "  labels: (built-in)");
        } else {
            let _ = writeln!(out, "  labels:");
            describe_labels(&mut out, "class", &self.labels.class);
            describe_labels(&mut out, "race", &self.labels.race);
            describe_labels(&mut out, "rank", &self.labels.rank);
            describe_labels(&mut out, "role", &self.labels.role);
        }

        let _ = writeln!(out, "Shortcodes:");
        for shortcode in all_shortcodes() {
            let _ = writeln!(
                out,
                "  {SHORTCODE_PREFIX}{}{SHORTCODE_SUFFIX}  {}",
                shortcode.name, shortcode.help
            );
        }
        out
    }
}

fn describe_labels(out: &mut String, category: &str, labels: &BTreeMap<String, String>) {
    for (code, label) in labels {
        let _ = writeln!(out, "    {category}.{code}: {label}");
    }
}
