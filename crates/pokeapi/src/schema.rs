//! Raw PokéAPI payloads and their conversion into catalog types.
//!
//! Only the fields the catalog uses are decoded; everything else in the
//! upstream documents is ignored. Optional upstream fields default so a
//! sparse record still converts.

use serde::Deserialize;

use pokedex_core::error::CoreError;
use pokedex_core::types::{
    entry_id, Ability, Artwork, Entry, EntryRef, ListPage, Stat, TypeMembers,
};

/// `{name, url}` pair used throughout the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

// ---------------------------------------------------------------------------
// /pokemon/{id or name}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawPokemon {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: RawSprites,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
    #[serde(default)]
    pub abilities: Vec<RawAbilitySlot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<RawOtherSprites>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<RawSprite>,
    #[serde(default)]
    pub home: Option<RawSprite>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub type_ref: RawNamed,
}

#[derive(Debug, Deserialize)]
pub struct RawStat {
    pub base_stat: u32,
    pub stat: RawNamed,
}

#[derive(Debug, Deserialize)]
pub struct RawAbilitySlot {
    pub ability: RawNamed,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u32,
}

impl TryFrom<RawPokemon> for Entry {
    type Error = CoreError;

    fn try_from(raw: RawPokemon) -> Result<Self, Self::Error> {
        let id = entry_id(raw.id)?;
        if raw.name.trim().is_empty() {
            return Err(CoreError::Schema {
                id,
                reason: "empty name".into(),
            });
        }

        let mut types = raw.types;
        types.sort_by_key(|t| t.slot);

        let mut abilities = raw.abilities;
        abilities.sort_by_key(|a| a.slot);

        let other = raw.sprites.other.unwrap_or_default();
        let artwork = Artwork {
            official: other.official_artwork.and_then(|s| s.front_default),
            home: other.home.and_then(|s| s.front_default),
            default: raw.sprites.front_default,
        };

        Ok(Entry {
            id,
            name: raw.name,
            height: raw.height,
            weight: raw.weight,
            types: types.into_iter().map(|t| t.type_ref.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            abilities: abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    hidden: a.is_hidden,
                })
                .collect(),
            base_experience: raw.base_experience,
            artwork,
        })
    }
}

// ---------------------------------------------------------------------------
// /pokemon?limit&offset
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawListResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<RawNamed>,
}

impl From<RawListResponse> for ListPage {
    fn from(raw: RawListResponse) -> Self {
        ListPage {
            count: raw.count,
            next: raw.next,
            previous: raw.previous,
            results: raw.results.into_iter().map(EntryRef::from).collect(),
        }
    }
}

impl From<RawNamed> for EntryRef {
    fn from(raw: RawNamed) -> Self {
        EntryRef {
            name: raw.name,
            url: raw.url,
        }
    }
}

// ---------------------------------------------------------------------------
// /type/{name} and /type
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawTypeResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<RawTypeMember>,
}

#[derive(Debug, Deserialize)]
pub struct RawTypeMember {
    pub pokemon: RawNamed,
}

impl From<RawTypeResponse> for TypeMembers {
    fn from(raw: RawTypeResponse) -> Self {
        TypeMembers {
            id: raw.id,
            name: raw.name,
            members: raw.pokemon.into_iter().map(|m| m.pokemon.into()).collect(),
        }
    }
}

/// Resource index, e.g. the list of all type names.
#[derive(Debug, Deserialize)]
pub struct RawNamedList {
    #[serde(default)]
    pub results: Vec<RawNamed>,
}

impl RawNamedList {
    pub fn names(self) -> Vec<String> {
        self.results.into_iter().map(|r| r.name).collect()
    }
}
