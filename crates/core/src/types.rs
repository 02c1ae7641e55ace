//! Catalog record types shared by every layer.
//!
//! These are the validated, immutable snapshots the rest of the workspace
//! works with. The raw PokéAPI payloads are decoded into them at the
//! gateway boundary; nothing here knows about HTTP.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Primary key of a catalog entry (the national dex number).
pub type EntryId = u32;

/// Shown when an entry carries no artwork at all.
pub const PLACEHOLDER_ARTWORK: &str = "/pokemon-placeholder.png";

/// Validate a raw numeric id coming from the remote source.
pub fn entry_id(raw: i64) -> Result<EntryId, CoreError> {
    if raw <= 0 {
        return Err(CoreError::InvalidId(raw));
    }
    EntryId::try_from(raw).map_err(|_| CoreError::InvalidId(raw))
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    /// Height in decimeters.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Type tags in slot order.
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    pub base_experience: Option<u32>,
    pub artwork: Artwork,
}

/// One base stat, e.g. `("special-attack", 65)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
}

/// Candidate image URLs, any of which may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub official: Option<String>,
    pub home: Option<String>,
    pub default: Option<String>,
}

impl Artwork {
    /// Best available image: official artwork, then the "home" render,
    /// then the default sprite, then the local placeholder.
    pub fn url(&self) -> &str {
        [&self.official, &self.home, &self.default]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_ARTWORK)
    }
}

impl Entry {
    pub fn image_url(&self) -> &str {
        self.artwork.url()
    }

    /// Largest base stat, used to scale stat bars. Zero when there are none.
    pub fn max_stat(&self) -> u32 {
        self.stats.iter().map(|s| s.value).max().unwrap_or(0)
    }

    /// Sum of all base stats.
    pub fn total_stats(&self) -> u32 {
        self.stats.iter().map(|s| s.value).sum()
    }

    /// The entry before this one in dex order; the first entry has none.
    pub fn previous_id(&self) -> Option<EntryId> {
        (self.id > 1).then(|| self.id - 1)
    }

    /// The entry after this one in dex order. Whether it exists is only
    /// known once it is fetched.
    pub fn next_id(&self) -> EntryId {
        self.id.saturating_add(1)
    }
}

// ---------------------------------------------------------------------------
// References and listings
// ---------------------------------------------------------------------------

/// Lightweight `{name, url}` reference returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    pub name: String,
    pub url: String,
}

impl EntryRef {
    /// The id embedded in the reference URL, if it parses.
    pub fn id(&self) -> Option<EntryId> {
        id_from_url(&self.url)
    }
}

/// Extract the numeric id from a resource URL.
///
/// The id is the second-to-last `/`-separated segment, which relies on the
/// trailing slash upstream URLs carry (`.../pokemon/25/`).
///
/// # Examples
///
/// ```
/// use pokedex_core::types::id_from_url;
///
/// assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
/// assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
/// ```
pub fn id_from_url(url: &str) -> Option<EntryId> {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    segments[segments.len() - 2]
        .parse::<EntryId>()
        .ok()
        .filter(|id| *id > 0)
}

/// One page of the default ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Total number of entries upstream.
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<EntryRef>,
}

/// Members of a single type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMembers {
    pub id: u32,
    pub name: String,
    pub members: Vec<EntryRef>,
}

/// Collect the parsable ids of a reference list, in order.
pub fn ids_of(refs: &[EntryRef]) -> Vec<EntryId> {
    refs.iter()
        .filter_map(|r| {
            let id = r.id();
            if id.is_none() {
                tracing::debug!(name = %r.name, url = %r.url, "Skipping reference without id");
            }
            id
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(official: Option<&str>, home: Option<&str>, default: Option<&str>) -> Artwork {
        Artwork {
            official: official.map(String::from),
            home: home.map(String::from),
            default: default.map(String::from),
        }
    }

    // -- entry_id ------------------------------------------------------------

    #[test]
    fn entry_id_rejects_non_positive() {
        assert!(entry_id(0).is_err());
        assert!(entry_id(-4).is_err());
        assert_eq!(entry_id(151).unwrap(), 151);
    }

    // -- artwork fallback ----------------------------------------------------

    #[test]
    fn artwork_prefers_official() {
        let art = artwork(Some("official.png"), Some("home.png"), Some("front.png"));
        assert_eq!(art.url(), "official.png");
    }

    #[test]
    fn artwork_falls_back_to_home_then_default() {
        assert_eq!(artwork(None, Some("home.png"), Some("front.png")).url(), "home.png");
        assert_eq!(artwork(None, None, Some("front.png")).url(), "front.png");
    }

    #[test]
    fn artwork_skips_empty_strings() {
        assert_eq!(artwork(Some(""), None, Some("front.png")).url(), "front.png");
    }

    #[test]
    fn artwork_placeholder_when_nothing_present() {
        assert_eq!(Artwork::default().url(), PLACEHOLDER_ARTWORK);
    }

    // -- id_from_url ---------------------------------------------------------

    #[test]
    fn id_from_url_reads_second_to_last_segment() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/1/"), Some(1));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/10034/"), Some(10034));
    }

    #[test]
    fn id_from_url_without_trailing_slash_is_none() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25"), None);
    }

    #[test]
    fn id_from_url_garbage_is_none() {
        assert_eq!(id_from_url(""), None);
        assert_eq!(id_from_url("no-slashes"), None);
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
    }

    #[test]
    fn ids_of_skips_unparsable_refs() {
        let reference = |name: &str, url: &str| EntryRef {
            name: name.into(),
            url: url.into(),
        };
        let refs = vec![
            reference("bulbasaur", "https://x/pokemon/1/"),
            reference("broken", "https://x/pokemon/"),
            reference("ivysaur", "https://x/pokemon/2/"),
        ];
        assert_eq!(ids_of(&refs), vec![1, 2]);
    }

    // -- entry helpers -------------------------------------------------------

    fn pikachu() -> Entry {
        let stat = |name: &str, value: u32| Stat {
            name: name.into(),
            value,
        };
        Entry {
            id: 25,
            name: "pikachu".into(),
            height: 4,
            weight: 60,
            types: vec!["electric".into()],
            stats: vec![stat("hp", 35), stat("speed", 90)],
            abilities: vec![],
            base_experience: Some(112),
            artwork: Artwork::default(),
        }
    }

    #[test]
    fn max_stat_scales_bars() {
        assert_eq!(pikachu().max_stat(), 90);
        let bare = Entry {
            stats: vec![],
            ..pikachu()
        };
        assert_eq!(bare.max_stat(), 0);
    }

    #[test]
    fn total_stats_sums_every_stat() {
        assert_eq!(pikachu().total_stats(), 125);
        let bare = Entry {
            stats: vec![],
            ..pikachu()
        };
        assert_eq!(bare.total_stats(), 0);
    }

    #[test]
    fn adjacent_ids() {
        assert_eq!(pikachu().previous_id(), Some(24));
        assert_eq!(pikachu().next_id(), 26);

        let first = Entry { id: 1, ..pikachu() };
        assert_eq!(first.previous_id(), None);
        assert_eq!(first.next_id(), 2);
    }
}
