//! Plain-text roster listing
//!
//! Same grouping as the HTML renderer, laid out for a terminal.

use crate::api::GuildMember;
use crate::core::labels::LookupTables;
use crate::core::pipeline::RequestContext;
use crate::core::render::group_by_rank;
use std::error::Error;
use std::fmt::Write;

pub async fn list_members(context: &RequestContext) -> Result<(), Box<dyn Error>> {
    let settings = context.settings();
    let roster = context.fetch_members().await?;
    let guild_name = roster.guild_name.unwrap_or_else(|| settings.guild.clone());
    let realm = roster.realm.unwrap_or_else(|| settings.server.clone());
    let sorted = context.prepare(roster.members, &settings.ignored_ranks);
    print!(
        "{}",
        format_member_list(&guild_name, &realm, &sorted, context.tables())
    );
    Ok(())
}

pub fn format_member_list(
    guild_name: &str,
    realm: &str,
    sorted: &[GuildMember],
    tables: &LookupTables,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🏰 {guild_name} ({realm})");
    let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if sorted.is_empty() {
        let _ = writeln!(out, "No members to show.");
        return out;
    }

    for group in group_by_rank(sorted, tables) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", group.label, group.members.len());
        for member in group.members {
            let _ = writeln!(
                out,
                "  • {} - {} {} {}, {}",
                member.name,
                member.level,
                tables.race_label(member.race),
                tables.class_label(member.class),
                tables.role_label(member.role)
            );
        }
    }
    out
}
