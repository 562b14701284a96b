//! Rank grouping and HTML rendering of a sorted roster.

use crate::api::GuildMember;
use crate::core::labels::LookupTables;
use crate::utils::html::escape_html;
use crate::utils::url::{armory_profile_url, join_url};
use reqwest::Url;
use std::fmt::Write;

/// Base URLs used to build thumbnail and armory links for each card.
#[derive(Debug, Clone)]
pub struct RenderLinks {
    pub thumbnail_base_url: String,
    pub armory_base_url: Url,
    pub server: String,
}

/// Members sharing one rank, in roster order.
#[derive(Debug)]
pub struct RankGroup<'a> {
    pub rank: u32,
    pub label: String,
    pub members: Vec<&'a GuildMember>,
}

/// Split a rank-sorted roster into consecutive per-rank blocks.
///
/// A new block starts whenever a member's rank is greater than the rank of
/// the block being filled, so the input must already be sorted.
pub fn group_by_rank<'a>(sorted: &'a [GuildMember], tables: &LookupTables) -> Vec<RankGroup<'a>> {
    let mut groups: Vec<RankGroup<'a>> = Vec::new();
    let mut current: Option<RankGroup<'a>> = None;

    for member in sorted {
        if let Some(group) = current.as_mut() {
            if member.rank <= group.rank {
                group.members.push(member);
                continue;
            }
        }
        if let Some(done) = current.take() {
            groups.push(done);
        }
        current = Some(RankGroup {
            rank: member.rank,
            label: tables.rank_label(member.rank).to_string(),
            members: vec![member],
        });
    }

    if let Some(done) = current {
        groups.push(done);
    }
    groups
}

/// Render the roster as one `wbr_rank` section per rank.
///
/// An empty roster renders as an empty string.
pub fn render(sorted: &[GuildMember], tables: &LookupTables, links: &RenderLinks) -> String {
    let mut out = String::new();
    for group in group_by_rank(sorted, tables) {
        let _ = write!(
            out,
            r#"<div class="wbr_rank"><h1 class="wbr_rank_heading">{}</h1>"#,
            escape_html(&group.label)
        );
        for member in &group.members {
            render_card(&mut out, member, tables, links);
        }
        out.push_str("</div>");
    }
    out
}

fn render_card(out: &mut String, member: &GuildMember, tables: &LookupTables, links: &RenderLinks) {
    let thumbnail = join_url(&links.thumbnail_base_url, &member.thumbnail_path);
    let armory = armory_profile_url(&links.armory_base_url, &links.server, &member.name);

    let _ = write!(
        out,
        concat!(
            r#"<div class="wbr_character">"#,
            r#"<img class="rooster-thumbnail icon-medium rounded" src="{thumbnail}" />"#,
            r#"<a href="{armory}" target="_blank"><strong>{name}</strong></a>"#,
            "<br />{level}, {race}, {class}<br />{role}</div>"
        ),
        thumbnail = escape_html(&thumbnail),
        armory = escape_html(&armory),
        name = escape_html(&member.name),
        level = member.level,
        race = escape_html(tables.race_label(member.race)),
        class = escape_html(tables.class_label(member.class)),
        role = escape_html(tables.role_label(member.role)),
    );
}
