//! Request-scoped glue between the roster API, the filter/sort step, the
//! renderer and the shortcode scanner.
//!
//! A [`RequestContext`] is cheap to clone and holds only immutable state, so
//! the HTTP service hands one clone to each request.

use crate::api::{build_client, fetch_roster, FetchError, GuildMember, RosterResponse};
use crate::core::config::Settings;
use crate::core::constants::{ERROR_COMMENT_TAG, SHORTCODE_PREFIX, SHORTCODE_SUFFIX};
use crate::core::labels::LookupTables;
use crate::core::render::render;
use crate::core::roster::{filter, parse_ignored_ranks, sort_by_rank};
use crate::core::shortcode::{
    all_shortcodes, expand, ShortcodeHandler, ShortcodeKind, ShortcodeParams,
};
use std::collections::BTreeSet;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RequestContext {
    settings: Arc<Settings>,
    tables: Arc<LookupTables>,
    client: reqwest::Client,
}

impl RequestContext {
    /// Build the lookup tables and HTTP client for `settings`.
    pub fn new(settings: Settings) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let tables = LookupTables::builtin(&settings.language).with_overrides(&settings.labels)?;
        let client = build_client(settings.timeout)?;
        Ok(Self::with_parts(settings, tables, client))
    }

    pub fn with_parts(settings: Settings, tables: LookupTables, client: reqwest::Client) -> Self {
        Self {
            settings: Arc::new(settings),
            tables: Arc::new(tables),
            client,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub async fn fetch_members(&self) -> Result<RosterResponse, FetchError> {
        fetch_roster(&self.client, &self.settings.roster_request()).await
    }

    /// Drop ignored ranks, then order by rank.
    pub fn prepare(&self, members: Vec<GuildMember>, ignored: &BTreeSet<u32>) -> Vec<GuildMember> {
        sort_by_rank(filter(members, ignored))
    }

    pub fn render_members(&self, sorted: &[GuildMember]) -> String {
        render(sorted, &self.tables, &self.settings.render_links())
    }

    /// Fetch, filter with the configured ignore set, sort and render.
    pub async fn render_roster(&self) -> Result<String, FetchError> {
        let roster = self.fetch_members().await?;
        let sorted = self.prepare(roster.members, &self.settings.ignored_ranks);
        Ok(self.render_members(&sorted))
    }

    /// Replace every registered shortcode in `text`.
    ///
    /// The roster is fetched at most once, and only when the text contains a
    /// marker. A failed fetch turns each marker into an HTML comment.
    pub async fn expand_text(&self, text: &str) -> String {
        if !contains_marker(text) {
            return text.to_string();
        }

        let fetched = self.fetch_members().await;
        if let Err(err) = &fetched {
            warn!(error = %err, "roster unavailable for shortcode expansion");
        }

        let render_all = |params: &ShortcodeParams| self.expand_all(&fetched, params);
        let handlers: Vec<(&str, ShortcodeHandler<'_>)> = all_shortcodes()
            .iter()
            .map(|shortcode| {
                let handler: ShortcodeHandler<'_> = match shortcode.kind {
                    ShortcodeKind::All => &render_all,
                };
                (shortcode.name, handler)
            })
            .collect();

        expand(text, SHORTCODE_PREFIX, SHORTCODE_SUFFIX, &handlers)
    }

    fn expand_all(
        &self,
        fetched: &Result<RosterResponse, FetchError>,
        params: &ShortcodeParams,
    ) -> String {
        let roster = match fetched {
            Ok(roster) => roster,
            Err(err) => return error_comment(&err.to_string()),
        };

        let ignored = match params.get("ignore") {
            Some(spec) => match parse_ignored_ranks(spec) {
                Ok(ranks) => ranks,
                Err(reason) => {
                    warn!(%reason, "invalid ignore parameter on shortcode");
                    return error_comment(&format!("invalid ignore parameter: {reason}"));
                }
            },
            None => self.settings.ignored_ranks.clone(),
        };
        debug!(?ignored, "expanding roster shortcode");

        let sorted = self.prepare(roster.members.clone(), &ignored);
        self.render_members(&sorted)
    }
}

fn contains_marker(text: &str) -> bool {
    text.to_ascii_lowercase()
        .contains(&SHORTCODE_PREFIX.to_ascii_lowercase())
}

/// Inline HTML comment standing in for a marker that could not be rendered.
pub fn error_comment(message: &str) -> String {
    // "--" would end the comment early.
    let message = message.replace("--", "- -");
    format!("<!-- {ERROR_COMMENT_TAG}: {message} -->")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{
        json_response, test_settings, MockUpstream, SAMPLE_ROSTER_JSON,
    };

    async fn context_for(upstream: &MockUpstream) -> RequestContext {
        RequestContext::new(test_settings(&upstream.base_url())).expect("context should build")
    }

    fn headings(html: &str) -> Vec<String> {
        html.split(r#"<h1 class="wbr_rank_heading">"#)
            .skip(1)
            .filter_map(|part| part.split("</h1>").next())
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn render_roster_groups_sample_members() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let context = context_for(&upstream).await;

        let html = context.render_roster().await.expect("render should succeed");
        assert_eq!(headings(&html), vec!["Officers", "Guild Lead (Alts)", "Raider"]);

        let brokk = html.find("Brokk").expect("Brokk rendered");
        let cyra = html.find("Cyra").expect("Cyra rendered");
        let aldra = html.find("Aldra").expect("Aldra rendered");
        assert!(brokk < cyra && cyra < aldra);
        assert!(html.contains("<br />98, Tauren, Druid<br />Unknown role</div>"));
    }

    #[tokio::test]
    async fn render_roster_honours_ignored_ranks() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let mut settings = test_settings(&upstream.base_url());
        settings.ignored_ranks = BTreeSet::from([1, 2]);
        let context = RequestContext::new(settings).expect("context should build");

        let html = context.render_roster().await.expect("render should succeed");
        assert_eq!(headings(&html), vec!["Raider"]);
        assert!(!html.contains("Brokk"));
    }

    #[tokio::test]
    async fn render_roster_propagates_fetch_errors() {
        let upstream = MockUpstream::respond_with(json_response(503, "{}")).await;
        let context = context_for(&upstream).await;

        assert_eq!(
            context.render_roster().await,
            Err(FetchError::HttpStatus(503))
        );
    }

    #[tokio::test]
    async fn expand_text_without_marker_skips_fetch() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let context = context_for(&upstream).await;

        let out = context.expand_text("no roster here").await;
        assert_eq!(out, "no roster here");
        assert_eq!(upstream.request_line().await, "");
    }

    #[tokio::test]
    async fn expand_text_applies_per_marker_ignore_parameter() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let context = context_for(&upstream).await;

        let out = context
            .expand_text("<p>[[WBR:all]]</p><p>[[WBR:all ignore:1,3]]</p>")
            .await;
        let (first, second) = out.split_once("</p><p>").expect("two paragraphs");
        assert_eq!(headings(first), vec!["Officers", "Guild Lead (Alts)", "Raider"]);
        assert_eq!(headings(second), vec!["Guild Lead (Alts)"]);
    }

    #[tokio::test]
    async fn expand_text_turns_fetch_failure_into_comment() {
        let upstream = MockUpstream::respond_with(json_response(404, "{}")).await;
        let context = context_for(&upstream).await;

        let out = context.expand_text("before [[WBR:all]] after").await;
        assert_eq!(
            out,
            "before <!-- bnet-roster: Roster request failed with HTTP status 404 --> after"
        );
    }

    #[tokio::test]
    async fn expand_text_reports_bad_ignore_parameter_inline() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let context = context_for(&upstream).await;

        let out = context.expand_text("[[WBR:all ignore:x]]").await;
        assert!(out.starts_with("<!-- bnet-roster: invalid ignore parameter"));
        assert!(out.ends_with(" -->"));
    }

    #[test]
    fn error_comment_cannot_close_early() {
        assert_eq!(error_comment("a -- b"), "<!-- bnet-roster: a - - b -->");
    }
}
