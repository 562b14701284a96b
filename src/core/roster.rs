//! Rank filtering and ordering of roster members.

use crate::api::GuildMember;
use std::collections::BTreeSet;

/// Parse the comma-separated ignore list from configuration ("2,6,7").
///
/// Blank entries are skipped so trailing commas and empty strings are fine.
pub fn parse_ignored_ranks(spec: &str) -> Result<BTreeSet<u32>, String> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<u32>()
                .map_err(|_| format!("'{entry}' is not a rank number"))
        })
        .collect()
}

/// Drop every member whose rank is ignored, keeping the survivors' order.
pub fn filter(members: Vec<GuildMember>, ignored: &BTreeSet<u32>) -> Vec<GuildMember> {
    if ignored.is_empty() {
        return members;
    }
    members
        .into_iter()
        .filter(|member| !ignored.contains(&member.rank))
        .collect()
}

/// Stable ascending sort by rank; equal ranks keep their API order.
pub fn sort_by_rank(mut members: Vec<GuildMember>) -> Vec<GuildMember> {
    members.sort_by_key(|member| member.rank);
    members
}
