//! Result composition: from filter state and fetched inputs to the page
//! of entries on screen.
//!
//! Composition happens in two steps. [`candidate_ids`] picks the ids to
//! fetch details for, following a fixed precedence (favorites, search +
//! type, search, type, default listing). [`compose`] then sorts the
//! fetched details, re-checks favorites and cuts the requested page.
//! Both are pure so the orchestration layer can call them whenever its
//! inputs settle.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::filter::{FilterState, SortKey};
use crate::types::{ids_of, Entry, EntryId, ListPage, TypeMembers};

/// Entries per page, both for server-side offsets and client-side slicing.
pub const DEFAULT_PAGE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// Branch selection
// ---------------------------------------------------------------------------

/// Which rule of the decision table a filter state falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Favorites-only: candidates are the favorites set.
    Favorites,
    /// Search restricted to a type.
    SearchInType,
    Search,
    Type,
    /// Server-side paginated default listing.
    DefaultList,
}

impl Branch {
    pub fn of(filter: &FilterState) -> Self {
        if filter.favorites_only {
            return Self::Favorites;
        }
        match (filter.search_term(), filter.type_filter()) {
            (Some(_), Some(_)) => Self::SearchInType,
            (Some(_), None) => Self::Search,
            (None, Some(_)) => Self::Type,
            (None, None) => Self::DefaultList,
        }
    }

    pub fn needs_search(self) -> bool {
        matches!(self, Self::Search | Self::SearchInType)
    }

    pub fn needs_type_members(self) -> bool {
        matches!(self, Self::Type | Self::SearchInType)
    }

    pub fn needs_list(self) -> bool {
        self == Self::DefaultList
    }

    /// Whether pagination was already applied upstream via `offset`.
    pub fn paginated_upstream(self) -> bool {
        self == Self::DefaultList
    }
}

/// Server-side offset for the default listing of `page`.
pub fn list_offset(page: u32, page_size: usize) -> usize {
    (page.max(1) as usize - 1) * page_size
}

// ---------------------------------------------------------------------------
// Candidate ids
// ---------------------------------------------------------------------------

/// Completed outcome of a name/id search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    Found(EntryId),
    NoMatch,
}

/// Remote inputs resolved so far for the current filter. `None` means
/// the fetch has not completed (or is not needed).
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateInputs<'a> {
    pub list: Option<&'a ListPage>,
    pub search: Option<SearchOutcome>,
    pub type_members: Option<&'a TypeMembers>,
}

/// Candidate id set, or `None` while a required input is still pending.
///
/// Order is meaningful only for the default listing (upstream order);
/// every other branch is sorted later anyway.
pub fn candidate_ids(
    filter: &FilterState,
    favorites: &BTreeSet<EntryId>,
    inputs: &CandidateInputs<'_>,
) -> Option<Vec<EntryId>> {
    match Branch::of(filter) {
        Branch::Favorites => Some(favorites.iter().copied().collect()),
        Branch::SearchInType => {
            let search = inputs.search?;
            let members = inputs.type_members?;
            Some(match search {
                SearchOutcome::Found(id) if ids_of(&members.members).contains(&id) => vec![id],
                _ => Vec::new(),
            })
        }
        Branch::Search => Some(match inputs.search? {
            SearchOutcome::Found(id) => vec![id],
            SearchOutcome::NoMatch => Vec::new(),
        }),
        Branch::Type => inputs.type_members.map(|members| ids_of(&members.members)),
        Branch::DefaultList => inputs.list.map(|list| ids_of(&list.results)),
    }
}

// ---------------------------------------------------------------------------
// "No match" classification
// ---------------------------------------------------------------------------

/// Why a completed search produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatch {
    /// Nothing answers to the query.
    Query,
    /// The query matched, but not within the selected type.
    QueryInType,
}

/// Derived "not found" state for a search, or `None` when the search is
/// absent, still pending, or matched something visible.
pub fn no_match(
    filter: &FilterState,
    search: Option<SearchOutcome>,
    type_members: Option<&TypeMembers>,
) -> Option<NoMatch> {
    if !Branch::of(filter).needs_search() {
        return None;
    }
    match search? {
        SearchOutcome::NoMatch => Some(NoMatch::Query),
        SearchOutcome::Found(id) => {
            filter.type_filter()?;
            let members = type_members?;
            (!ids_of(&members.members).contains(&id)).then_some(NoMatch::QueryInType)
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Total order for `key`, ties broken by ascending id.
pub fn compare(a: &Entry, b: &Entry, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Id => Ordering::Equal,
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Height => b.height.cmp(&a.height),
        SortKey::Weight => b.weight.cmp(&a.weight),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

pub fn sort_entries(entries: &mut [Entry], key: SortKey) {
    entries.sort_by(|a, b| compare(a, b, key));
}

// ---------------------------------------------------------------------------
// Page composition
// ---------------------------------------------------------------------------

/// The final, displayable slice of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    /// Entries of the current page, in display order.
    pub entries: Vec<Entry>,
    /// Result count after sorting and the favorites re-check.
    pub total_items: usize,
    /// `ceil(total_items / page_size)`.
    pub total_pages: u32,
    pub page: u32,
    /// Size of the whole upstream listing, for the default listing only.
    pub upstream_count: Option<u32>,
}

impl ComposedPage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `ceil(total_items / page_size)`; zero items means zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size) as u32
}

/// Sort, re-check favorites and slice the fetched details into a page.
///
/// For the default listing the details already are the requested page,
/// so the window covers the whole batch.
pub fn compose(
    filter: &FilterState,
    favorites: &BTreeSet<EntryId>,
    mut details: Vec<Entry>,
    list: Option<&ListPage>,
    page_size: usize,
) -> ComposedPage {
    let branch = Branch::of(filter);

    sort_entries(&mut details, filter.sort);
    if filter.favorites_only {
        details.retain(|entry| favorites.contains(&entry.id));
    }

    let total_items = details.len();
    let entries = if branch.paginated_upstream() {
        details
    } else {
        let start = list_offset(filter.page, page_size);
        details.into_iter().skip(start).take(page_size).collect()
    };

    ComposedPage {
        entries,
        total_items,
        total_pages: total_pages(total_items, page_size),
        page: filter.page,
        upstream_count: if branch.paginated_upstream() { list.map(|l| l.count) } else { None },
    }
}
