//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod expand;
pub mod member_list;
pub mod render;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::expand::expand_input;
use crate::cli::member_list::list_members;
use crate::cli::render::render_roster;
use crate::core::config::data::path_display;
use crate::core::config::defaults::API_KEY_ENV;
use crate::core::config::{Config, ConfigOverrides, EffectiveConfig, Settings};
use crate::core::pipeline::RequestContext;
use crate::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "bnet-roster")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Render a World of Warcraft guild roster as HTML")]
#[command(
    long_about = "bnet-roster fetches a guild's member list from the Battle.net community API \
and renders it as an HTML fragment grouped by guild rank.\n\n\
Configuration:\n\
  Settings are read from config.toml in the platform config directory \
(see 'bnet-roster config'), or from the file given with --config.\n\n\
Environment Variables:\n\
  BNET_API_KEY      API key used when the config file has none\n\
  RUST_LOG          Log filter for diagnostics on stderr (default: warn)\n\n\
Shortcodes:\n\
  [[WBR:all]]                 The complete roster\n\
  [[WBR:all ignore:2,6]]      The roster without ranks 2 and 6"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Realm the guild lives on
    #[arg(short = 's', long, global = true)]
    pub server: Option<String>,

    /// Guild name
    #[arg(short = 'g', long, global = true)]
    pub guild: Option<String>,

    /// API locale, e.g. en_GB or de_DE
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Comma-separated ranks to hide, e.g. 2,6,7
    #[arg(long, global = true, value_name = "RANKS")]
    pub ignore_ranks: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the roster and print the HTML fragment (default)
    Render,
    /// Fetch the roster and print it as plain text grouped by rank
    Members,
    /// Expand roster shortcodes in a file (or stdin) and print the result
    Expand {
        /// File to read; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Serve the roster over HTTP
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(short = 'b', long)]
        bind: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        let bind = match &self.command {
            Some(Commands::Serve { bind }) => bind.clone(),
            _ => None,
        };
        ConfigOverrides {
            server: self.server.clone(),
            guild: self.guild.clone(),
            locale: self.locale.clone(),
            ignore_ranks: self.ignore_ranks.clone(),
            bind,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_deref())?;
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Render) {
        Commands::Config => {
            match args.config {
                Some(path) => println!("Config file: {}", path_display(path)),
                None => println!("Config file: {}", path_display(Config::get_config_path()?)),
            }
            EffectiveConfig::merge(&config, &overrides, env_api_key()).print_all();
            Ok(())
        }
        Commands::Render => {
            let context = build_context(&config, &overrides)?;
            render_roster(&context).await
        }
        Commands::Members => {
            let context = build_context(&config, &overrides)?;
            list_members(&context).await
        }
        Commands::Expand { input } => {
            let context = build_context(&config, &overrides)?;
            expand_input(&context, input.as_deref()).await
        }
        Commands::Serve { .. } => {
            let context = build_context(&config, &overrides)?;
            let bind = context.settings().bind.clone();
            crate::server::serve(context, &bind).await
        }
    }
}

/// Resolve settings from the file, the flags and the environment.
pub fn resolve_settings(
    config: &Config,
    overrides: &ConfigOverrides,
) -> Result<Settings, Box<dyn Error>> {
    Ok(Settings::resolve(config, overrides, env_api_key())?)
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn build_context(
    config: &Config,
    overrides: &ConfigOverrides,
) -> Result<RequestContext, Box<dyn Error>> {
    let settings = resolve_settings(config, overrides)?;
    RequestContext::new(settings).map_err(|err| -> Box<dyn Error> { err })
}
