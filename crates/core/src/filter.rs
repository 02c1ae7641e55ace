//! Filter state and its URL query-string codec.
//!
//! [`FilterState`] is the single source of truth for what the catalog
//! fetches and displays. It round-trips through a query string such as
//! `?query=pikachu&type=electric&sort=name&page=2&favorites=true`; fields
//! at their default value are omitted on encode and substituted on decode.
//!
//! The codec here is pure. Writing the encoded value somewhere navigable
//! is the job of [`crate::location`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Query-string keys
// ---------------------------------------------------------------------------

pub const KEY_QUERY: &str = "query";
pub const KEY_TYPE: &str = "type";
pub const KEY_SORT: &str = "sort";
pub const KEY_PAGE: &str = "page";
pub const KEY_FAVORITES: &str = "favorites";

/// Type value that some links use for "no type filter".
const TYPE_ALL: &str = "all";

// ---------------------------------------------------------------------------
// Sort key
// ---------------------------------------------------------------------------

/// Ordering applied to the fetched entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Ascending id.
    #[default]
    Id,
    /// Case-normalized name, A to Z.
    Name,
    /// Tallest first.
    Height,
    /// Heaviest first.
    Weight,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Id, SortKey::Name, SortKey::Height, SortKey::Weight];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Height => "height",
            Self::Weight => "weight",
        }
    }

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID (Default)",
            Self::Name => "Name (A-Z)",
            Self::Height => "Height (Tallest)",
            Self::Weight => "Weight (Heaviest)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "height" => Ok(Self::Height),
            "weight" => Ok(Self::Weight),
            other => Err(CoreError::Validation(format!(
                "Unknown sort key '{other}'. Must be one of: id, name, height, weight"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The user-chosen query/type/sort/page/favorites configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search, by name or id. Empty means no search.
    pub query: String,
    /// Selected type tag. Empty or `all` means all types; decode and
    /// [`FilterState::apply`] store it trimmed and lowercased.
    pub type_name: String,
    pub sort: SortKey,
    /// 1-based page number, never zero.
    pub page: u32,
    pub favorites_only: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            type_name: String::new(),
            sort: SortKey::Id,
            page: 1,
            favorites_only: false,
        }
    }
}

impl FilterState {
    /// Decode a query string (with or without the leading `?`).
    ///
    /// Missing or malformed fields fall back to their defaults; decoding
    /// never fails. The first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let raw = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if seen.iter().any(|k| *k == key) {
                continue;
            }
            seen.push(key.to_string());

            match key.as_ref() {
                KEY_QUERY => state.query = value.into_owned(),
                KEY_TYPE => state.type_name = normalize_type(&value),
                KEY_SORT => state.sort = value.parse().unwrap_or_default(),
                KEY_PAGE => state.page = parse_page(&value),
                KEY_FAVORITES => state.favorites_only = value == "true",
                _ => {}
            }
        }

        state
    }

    /// Encode as a query string without the leading `?`.
    ///
    /// Default-valued fields are omitted, so the default state encodes to
    /// the empty string. The type is written in its normalized form.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.query.is_empty() {
            out.append_pair(KEY_QUERY, &self.query);
        }
        let type_name = normalize_type(&self.type_name);
        if !type_name.is_empty() {
            out.append_pair(KEY_TYPE, &type_name);
        }
        if self.sort != SortKey::Id {
            out.append_pair(KEY_SORT, self.sort.as_str());
        }
        if self.page > 1 {
            out.append_pair(KEY_PAGE, &self.page.to_string());
        }
        if self.favorites_only {
            out.append_pair(KEY_FAVORITES, "true");
        }
        out.finish()
    }

    /// Merge a partial update over this state.
    ///
    /// Touching any field other than `page` sends the user back to page 1,
    /// even when the update also names a page.
    pub fn apply(&self, update: &FilterUpdate) -> Self {
        let mut next = self.clone();

        if let Some(query) = &update.query {
            next.query = query.clone();
        }
        if let Some(type_name) = &update.type_name {
            next.type_name = normalize_type(type_name);
        }
        if let Some(sort) = update.sort {
            next.sort = sort;
        }
        if let Some(favorites_only) = update.favorites_only {
            next.favorites_only = favorites_only;
        }

        next.page = if update.touches_filters() {
            1
        } else {
            update.page.map_or(self.page, |p| p.max(1))
        };

        next
    }

    /// Trimmed query, or `None` when nothing searchable was typed.
    pub fn search_term(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Selected type, or `None` for all types.
    pub fn type_filter(&self) -> Option<&str> {
        let trimmed = self.type_name.trim();
        (!trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(TYPE_ALL)).then_some(trimmed)
    }

    /// Whether anything differs from the unfiltered default view
    /// (the page number does not count).
    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty()
            || self.type_filter().is_some()
            || self.favorites_only
            || self.sort != SortKey::Id
    }
}

fn normalize_type(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(TYPE_ALL) {
        String::new()
    } else {
        trimmed.to_lowercase()
    }
}

fn parse_page(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// A partial change to [`FilterState`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub query: Option<String>,
    pub type_name: Option<String>,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub favorites_only: Option<bool>,
}

impl FilterUpdate {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn type_name(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    pub fn sort(sort: SortKey) -> Self {
        Self {
            sort: Some(sort),
            ..Default::default()
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn favorites_only(favorites_only: bool) -> Self {
        Self {
            favorites_only: Some(favorites_only),
            ..Default::default()
        }
    }

    /// The "Clear All" action: every dimension back to its default.
    pub fn clear_all() -> Self {
        Self {
            query: Some(String::new()),
            type_name: Some(String::new()),
            sort: Some(SortKey::Id),
            page: Some(1),
            favorites_only: Some(false),
        }
    }

    /// True when the update sets anything besides the page.
    pub fn touches_filters(&self) -> bool {
        self.query.is_some()
            || self.type_name.is_some()
            || self.sort.is_some()
            || self.favorites_only.is_some()
    }
}
