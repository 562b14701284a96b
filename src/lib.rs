//! bnet-roster fetches a guild's member list from the Battle.net community
//! API and renders it as an HTML fragment grouped by guild rank.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the roster payloads and the HTTP fetch with its typed
//!   errors.
//! - [`core`] owns configuration, label tables, rank filtering and ordering,
//!   HTML rendering, and shortcode expansion, tied together by
//!   [`core::pipeline::RequestContext`].
//! - [`server`] exposes the rendered roster over HTTP.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod server;
pub mod utils;
