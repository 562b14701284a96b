use serde::Deserialize;

pub mod roster;

pub use roster::{build_client, fetch_roster, FetchError, RosterRequest};

/// Specialisation role as reported by the roster API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Role {
    Tank,
    Healing,
    Dps,
    #[default]
    Unknown,
}

impl Role {
    /// Map the API's upper-case role string. Anything unrecognised is `Unknown`.
    pub fn from_api(value: &str) -> Self {
        match value.trim() {
            "TANK" => Role::Tank,
            "HEALING" => Role::Healing,
            "DPS" => Role::Dps,
            _ => Role::Unknown,
        }
    }

    /// Key used by the label tables and the `[labels.role]` config section.
    pub fn key(self) -> &'static str {
        match self {
            Role::Tank => "TANK",
            Role::Healing => "HEALING",
            Role::Dps => "DPS",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_api(&raw))
    }
}

#[derive(Deserialize)]
pub struct RosterPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub realm: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Deserialize)]
pub struct MemberEntry {
    pub rank: u32,
    pub character: CharacterEntry,
}

#[derive(Deserialize)]
pub struct CharacterEntry {
    pub name: String,
    #[serde(default)]
    pub race: u32,
    #[serde(default)]
    pub gender: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub class: u32,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub spec: Option<SpecEntry>,
}

#[derive(Deserialize)]
pub struct SpecEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// One roster entry, flattened out of the API's nested member/character shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub name: String,
    pub race: u32,
    pub gender: u32,
    pub level: u32,
    pub class: u32,
    pub thumbnail_path: String,
    pub spec_name: String,
    pub role: Role,
    pub rank: u32,
}

impl From<MemberEntry> for GuildMember {
    fn from(entry: MemberEntry) -> Self {
        let MemberEntry { rank, character } = entry;
        let (spec_name, role) = match character.spec {
            Some(spec) => (spec.name, spec.role),
            None => (String::new(), Role::Unknown),
        };
        GuildMember {
            name: character.name,
            race: character.race,
            gender: character.gender,
            level: character.level,
            class: character.class,
            thumbnail_path: character.thumbnail,
            spec_name,
            role,
            rank,
        }
    }
}

/// Members of one guild in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterResponse {
    pub guild_name: Option<String>,
    pub realm: Option<String>,
    pub members: Vec<GuildMember>,
}

impl From<RosterPayload> for RosterResponse {
    fn from(payload: RosterPayload) -> Self {
        RosterResponse {
            guild_name: payload.name,
            realm: payload.realm,
            members: payload.members.into_iter().map(GuildMember::from).collect(),
        }
    }
}
