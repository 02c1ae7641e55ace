//! User-visible outcomes: error and empty states with their actions.
//!
//! Every surfaced failure offers at least [`Action::Retry`]; lookups of a
//! single entry also offer a way back to the list. Empty states carry the
//! filter-clearing actions that make sense for the situation.

use crate::compose::NoMatch;
use crate::filter::{FilterState, FilterUpdate};
use crate::naming::format_name;

/// Something the user can do from an error or empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Refetch whatever failed.
    Retry,
    /// Navigate back to the unfiltered list.
    GoHome,
    ClearSearch,
    ClearType,
    /// Reset every filter dimension.
    ClearFilters,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Retry => "Try Again",
            Self::GoHome => "Go Home",
            Self::ClearSearch => "Clear Search",
            Self::ClearType => "Clear Type Filter",
            Self::ClearFilters => "Clear Filters",
        }
    }

    /// Filter update this action performs, if it is a filter action.
    pub fn filter_update(self) -> Option<FilterUpdate> {
        match self {
            Self::ClearSearch => Some(FilterUpdate::query("")),
            Self::ClearType => Some(FilterUpdate::type_name("")),
            Self::ClearFilters | Self::GoHome => Some(FilterUpdate::clear_all()),
            Self::Retry => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub title: String,
    pub message: String,
    pub actions: Vec<Action>,
}

impl ErrorState {
    /// A listing, type, search or detail-batch fetch failed in transport.
    pub fn list_failed() -> Self {
        Self {
            title: "Failed to load Pokémon".into(),
            message: "We couldn't fetch the Pokémon data. \
                      Please check your connection and try again."
                .into(),
            actions: vec![Action::Retry],
        }
    }

    /// A direct lookup of one entry failed, whether missing or unreachable.
    pub fn detail_failed() -> Self {
        Self {
            title: "Pokémon not found".into(),
            message: "We couldn't find the Pokémon you're looking for. \
                      It might have been moved or doesn't exist."
                .into(),
            actions: vec![Action::Retry, Action::GoHome],
        }
    }
}

// ---------------------------------------------------------------------------
// Empty state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub message: String,
    pub actions: Vec<Action>,
}

impl EmptyState {
    /// A completed search found nothing (or nothing in the selected type).
    pub fn no_match(filter: &FilterState, reason: NoMatch) -> Self {
        let query = filter.query.trim();
        match (reason, filter.type_filter()) {
            (NoMatch::QueryInType, Some(type_name)) => Self {
                title: "No Pokémon found".into(),
                message: format!(
                    "We couldn't find any Pokémon matching \"{query}\" in the {} type. \
                     Try a different search term or clear the type filter.",
                    format_name(type_name)
                ),
                actions: vec![Action::ClearSearch, Action::ClearType],
            },
            (_, type_name) => Self {
                title: "No Pokémon found".into(),
                message: format!(
                    "We couldn't find any Pokémon matching \"{query}\". \
                     Please check the spelling and try again."
                ),
                actions: if type_name.is_some() {
                    vec![Action::ClearSearch, Action::ClearType]
                } else {
                    vec![Action::ClearSearch]
                },
            },
        }
    }

    /// Nothing to show for a non-search reason.
    pub fn no_results(filter: &FilterState) -> Self {
        if filter.favorites_only {
            Self {
                title: "No favorites yet".into(),
                message: "Start exploring and add some Pokémon to your favorites!".into(),
                actions: vec![Action::ClearFilters],
            }
        } else {
            Self {
                title: "No results".into(),
                message: "Try adjusting your filters to see more results.".into(),
                actions: vec![Action::ClearFilters],
            }
        }
    }
}
