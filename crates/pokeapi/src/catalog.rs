//! Catalog session: filter state in, displayable view out.
//!
//! A refresh is split in three so fetching never holds the session:
//!
//! 1. [`Catalog::plan`] snapshots the filter, favorites and cache hits and
//!    hands out the current cancellation token.
//! 2. [`execute`] performs the remaining fetches against a
//!    [`PokemonSource`]: list, search and type membership concurrently,
//!    then the detail batch for the resulting candidate ids.
//! 3. [`Catalog::complete`] applies the result, unless the filter moved
//!    on in the meantime (stale) or the fetch was cancelled. A rejected
//!    result changes nothing.
//!
//! Every filter change cancels the in-flight generation and issues a
//! fresh token, so superseded requests are aborted rather than merely
//! ignored.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use pokedex_core::compose::{
    self, candidate_ids, list_offset, Branch, CandidateInputs, ComposedPage, NoMatch, SearchOutcome,
};
use pokedex_core::favorites::FavoritesStore;
use pokedex_core::filter::{FilterState, FilterUpdate};
use pokedex_core::location::{FilterLocation, Navigator};
use pokedex_core::types::{Entry, EntryId, ListPage, TypeMembers};
use pokedex_core::view::{EmptyState, ErrorState};

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ErrorKind, GatewayError};
use crate::source::PokemonSource;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// What the list view shows for a filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub filter: FilterState,
    pub outcome: ViewOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// A non-empty page of entries.
    Results(ComposedPage),
    /// A completed search found nothing to show.
    NoMatch { reason: NoMatch, state: EmptyState },
    /// Nothing to show for any other reason (e.g. no favorites yet).
    Empty { page: ComposedPage, state: EmptyState },
    /// A fetch failed; the state carries the retry affordance.
    Failed { kind: ErrorKind, state: ErrorState },
}

impl CatalogView {
    pub fn page(&self) -> Option<&ComposedPage> {
        match &self.outcome {
            ViewOutcome::Results(page) | ViewOutcome::Empty { page, .. } => Some(page),
            ViewOutcome::NoMatch { .. } | ViewOutcome::Failed { .. } => None,
        }
    }
}

/// How [`Catalog::complete`] disposed of a load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result became the current view.
    Applied,
    /// The filter changed since the load was planned.
    Stale,
    /// The load was cancelled before it finished.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Plan / result
// ---------------------------------------------------------------------------

/// Everything a load needs, detached from the session.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    filter: FilterState,
    favorites: BTreeSet<EntryId>,
    page_size: usize,
    cancel: CancellationToken,
    list: Option<ListPage>,
    search: Option<Option<Entry>>,
    type_members: Option<TypeMembers>,
    /// Previously fetched details, reusable for overlapping candidate sets.
    batch: Option<(QueryKey, Vec<Entry>)>,
}

impl LoadPlan {
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Outcome of [`execute`], to be handed to [`Catalog::complete`].
#[derive(Debug)]
pub struct LoadResult {
    filter: FilterState,
    favorites: BTreeSet<EntryId>,
    cancel: CancellationToken,
    list: Option<ListPage>,
    search: Option<Option<Entry>>,
    type_members: Option<TypeMembers>,
    details: Option<(QueryKey, Vec<Entry>)>,
    error: Option<GatewayError>,
}

impl LoadResult {
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    fn search_outcome(&self) -> Option<SearchOutcome> {
        self.search.as_ref().map(|found| match found {
            Some(entry) => SearchOutcome::Found(entry.id),
            None => SearchOutcome::NoMatch,
        })
    }
}

/// Keep the first failure; a cancellation outranks anything else.
fn record(error: &mut Option<GatewayError>, e: GatewayError) {
    match error {
        Some(existing) if existing.is_cancelled() || !e.is_cancelled() => {}
        _ => *error = Some(e),
    }
}

fn settle<T>(
    slot: &mut Option<T>,
    fetched: Option<Result<T, GatewayError>>,
    error: &mut Option<GatewayError>,
) {
    match fetched {
        Some(Ok(value)) => *slot = Some(value),
        Some(Err(e)) => record(error, e),
        None => {}
    }
}

/// Run the fetches a plan still needs.
///
/// Never touches the session; the result is applied (or rejected) by
/// [`Catalog::complete`].
pub async fn execute(source: &dyn PokemonSource, plan: LoadPlan) -> LoadResult {
    let LoadPlan {
        filter,
        favorites,
        page_size,
        cancel,
        mut list,
        mut search,
        mut type_members,
        batch,
    } = plan;
    let branch = Branch::of(&filter);

    let need_list = branch.needs_list() && list.is_none();
    let need_search = branch.needs_search() && search.is_none();
    let need_type = branch.needs_type_members() && type_members.is_none();
    let offset = list_offset(filter.page, page_size);
    let term = filter.search_term().unwrap_or_default();
    let type_name = filter.type_filter().unwrap_or_default();

    let (fetched_list, fetched_search, fetched_type) = tokio::join!(
        async {
            if need_list {
                Some(source.fetch_list(page_size, offset, &cancel).await)
            } else {
                None
            }
        },
        async {
            if need_search {
                Some(source.resolve_search(term, &cancel).await)
            } else {
                None
            }
        },
        async {
            if need_type {
                Some(source.fetch_by_type(type_name, &cancel).await)
            } else {
                None
            }
        },
    );

    let mut error = None;
    settle(&mut list, fetched_list, &mut error);
    settle(&mut search, fetched_search, &mut error);
    settle(&mut type_members, fetched_type, &mut error);

    let mut result = LoadResult {
        filter,
        favorites,
        cancel,
        list,
        search,
        type_members,
        details: None,
        error,
    };
    if result.error.is_some() {
        return result;
    }

    let inputs = CandidateInputs {
        list: result.list.as_ref(),
        search: result.search_outcome(),
        type_members: result.type_members.as_ref(),
    };
    let ids = candidate_ids(&result.filter, &result.favorites, &inputs).unwrap_or_default();

    match fetch_details(source, &ids, &result.search, batch, &result.cancel).await {
        Ok(details) => result.details = Some((QueryKey::Batch(ids), details)),
        Err(e) => record(&mut result.error, e),
    }
    result
}

/// Details for `ids`, reusing the cached batch and a found search entry,
/// fetching only what is missing.
async fn fetch_details(
    source: &dyn PokemonSource,
    ids: &[EntryId],
    search: &Option<Option<Entry>>,
    cached: Option<(QueryKey, Vec<Entry>)>,
    cancel: &CancellationToken,
) -> Result<Vec<Entry>, GatewayError> {
    let key = QueryKey::Batch(ids.to_vec());
    let mut known: HashMap<EntryId, Entry> = HashMap::new();
    if let Some((cached_key, entries)) = cached {
        if cached_key == key {
            return Ok(entries);
        }
        known.extend(entries.into_iter().map(|e| (e.id, e)));
    }
    if let Some(Some(found)) = search {
        known.insert(found.id, found.clone());
    }

    let missing: Vec<EntryId> = ids.iter().copied().filter(|id| !known.contains_key(id)).collect();
    let mut details: Vec<Entry> = ids.iter().filter_map(|id| known.remove(id)).collect();
    if !missing.is_empty() {
        tracing::debug!(reused = details.len(), missing = missing.len(), "Fetching detail batch");
        details.extend(source.fetch_batch(&missing, cancel).await?);
    }
    Ok(details)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One browsing session over a remote source.
pub struct Catalog<N> {
    source: Arc<dyn PokemonSource>,
    location: FilterLocation<N>,
    favorites: FavoritesStore,
    cache: QueryCache,
    page_size: usize,
    /// Cancelled on shutdown; parent of every generation token.
    root: CancellationToken,
    /// Token of the current filter generation.
    generation: CancellationToken,
    view: Option<CatalogView>,
}

impl<N: Navigator> Catalog<N> {
    pub fn new(
        source: Arc<dyn PokemonSource>,
        location: FilterLocation<N>,
        favorites: FavoritesStore,
        page_size: usize,
    ) -> Self {
        let root = CancellationToken::new();
        let generation = root.child_token();
        Self {
            source,
            location,
            favorites,
            cache: QueryCache::default(),
            page_size: page_size.max(1),
            root,
            generation,
            view: None,
        }
    }

    pub fn filters(&self) -> FilterState {
        self.location.read()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn location(&self) -> &FilterLocation<N> {
        &self.location
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The last applied view, if any load has completed.
    pub fn view(&self) -> Option<&CatalogView> {
        self.view.as_ref()
    }

    /// Apply a filter update. Supersedes in-flight loads if the state changed.
    pub fn update_filters(&mut self, update: &FilterUpdate) -> FilterState {
        let before = self.location.read();
        let after = self.location.apply(update);
        if after != before {
            self.supersede();
        }
        after
    }

    /// Run an external navigation (back, forward, pasted link) and pick up
    /// the resulting filter state.
    pub fn navigate(&mut self, navigation: impl FnOnce(&mut N)) -> FilterState {
        let before = self.location.read();
        navigation(self.location.navigator_mut());
        let after = self.location.read();
        if after != before {
            self.supersede();
        }
        after
    }

    /// Toggle a favorite; returns whether `id` is now a favorite.
    pub fn toggle_favorite(&mut self, id: EntryId) -> bool {
        let now_favorite = self.favorites.toggle(id);
        if self.location.read().favorites_only {
            self.supersede();
        }
        now_favorite
    }

    /// Abort in-flight loads without changing the filter.
    pub fn cancel_pending(&mut self) {
        self.supersede();
    }

    /// Abort everything, including future loads of this session.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    fn supersede(&mut self) {
        self.generation.cancel();
        self.generation = self.root.child_token();
        tracing::debug!(
            location = %self.location.navigator().location(),
            "Superseded in-flight loads"
        );
    }

    /// Snapshot what the current filter needs, including cache hits.
    pub fn plan(&self) -> LoadPlan {
        let filter = self.location.read();
        let branch = Branch::of(&filter);

        let list = branch
            .needs_list()
            .then(|| self.cache.list.get(&self.list_key(&filter)).cloned())
            .flatten();
        let search = filter
            .search_term()
            .filter(|_| branch.needs_search())
            .and_then(|term| self.cache.search.get(&QueryKey::search(term)).cloned());
        let type_members = filter
            .type_filter()
            .filter(|_| branch.needs_type_members())
            .and_then(|name| {
                let key = QueryKey::TypeMembers(name.to_string());
                self.cache.type_members.get(&key).cloned()
            });
        let batch = self
            .cache
            .batch
            .key()
            .cloned()
            .and_then(|key| self.cache.batch.get(&key).cloned().map(|entries| (key, entries)));

        LoadPlan {
            favorites: self.favorites.as_set().clone(),
            page_size: self.page_size,
            cancel: self.generation.clone(),
            filter,
            list,
            search,
            type_members,
            batch,
        }
    }

    fn list_key(&self, filter: &FilterState) -> QueryKey {
        QueryKey::List {
            limit: self.page_size,
            offset: list_offset(filter.page, self.page_size),
        }
    }

    /// Apply a load result, or reject it with no state change.
    pub fn complete(&mut self, result: LoadResult) -> Completion {
        let current = self.location.read();
        if result.filter != current
            || (current.favorites_only && &result.favorites != self.favorites.as_set())
        {
            tracing::debug!(
                planned = %result.filter.to_query(),
                current = %current.to_query(),
                "Discarding stale load result"
            );
            return Completion::Stale;
        }
        let cancelled = result.error.as_ref().is_some_and(GatewayError::is_cancelled);
        if result.cancel.is_cancelled() || cancelled {
            tracing::debug!(location = %current.to_query(), "Discarding cancelled load result");
            return Completion::Cancelled;
        }

        let search_outcome = result.search_outcome();
        let LoadResult {
            filter,
            list,
            search,
            type_members,
            details,
            error,
            ..
        } = result;

        if let Some(page) = &list {
            let key = self.list_key(&filter);
            self.cache.list.store(key, page.clone());
        }
        if let (Some(term), Some(found)) = (filter.search_term(), &search) {
            self.cache.search.store(QueryKey::search(term), found.clone());
        }
        if let (Some(name), Some(members)) = (filter.type_filter(), &type_members) {
            self.cache.type_members.store(QueryKey::TypeMembers(name.to_string()), members.clone());
        }

        let outcome = match (error, details) {
            (Some(e), _) => {
                tracing::warn!(location = %filter.to_query(), error = %e, "Catalog load failed");
                ViewOutcome::Failed {
                    kind: e.kind(),
                    state: ErrorState::list_failed(),
                }
            }
            (None, details) => {
                let entries = match details {
                    Some((key, entries)) => {
                        self.cache.batch.store(key, entries.clone());
                        entries
                    }
                    None => Vec::new(),
                };
                match compose::no_match(&filter, search_outcome, type_members.as_ref()) {
                    Some(reason) => ViewOutcome::NoMatch {
                        reason,
                        state: EmptyState::no_match(&filter, reason),
                    },
                    None => {
                        let page = compose::compose(
                            &filter,
                            self.favorites.as_set(),
                            entries,
                            list.as_ref(),
                            self.page_size,
                        );
                        if page.is_empty() {
                            ViewOutcome::Empty {
                                state: EmptyState::no_results(&filter),
                                page,
                            }
                        } else {
                            ViewOutcome::Results(page)
                        }
                    }
                }
            }
        };

        tracing::info!(location = %filter.to_query(), "Catalog view updated");
        self.view = Some(CatalogView { filter, outcome });
        Completion::Applied
    }

    /// Plan, fetch and apply in one go.
    pub async fn refresh(&mut self) -> Completion {
        let plan = self.plan();
        let source = Arc::clone(&self.source);
        let result = execute(source.as_ref(), plan).await;
        self.complete(result)
    }

    /// Drop the cached inputs of the current view and reload.
    ///
    /// In favorites-only mode only the detail batch is refetched;
    /// otherwise the listing, search and type membership are too.
    pub async fn retry(&mut self) -> Completion {
        if self.location.read().favorites_only {
            self.cache.batch.invalidate();
        } else {
            self.cache.invalidate_results();
        }
        self.refresh().await
    }

    /// Full record for the detail view.
    ///
    /// Served from the detail slot when the same entry was shown last.
    /// The fetch runs under the current generation, so a filter change,
    /// navigation or [`Catalog::cancel_pending`] aborts it.
    pub async fn detail(&mut self, id_or_name: &str) -> Result<Entry, GatewayError> {
        let key = QueryKey::detail(id_or_name);
        if let Some(entry) = self.cache.detail.get(&key) {
            return Ok(entry.clone());
        }
        let lookup = match &key {
            QueryKey::Detail(lookup) if !lookup.is_empty() => lookup.clone(),
            _ => {
                return Err(GatewayError::NotFound {
                    resource: "pokemon/".into(),
                    status: 404,
                })
            }
        };

        let cancel = self.generation.clone();
        let entry = self.source.fetch_by_id(&lookup, &cancel).await?;
        self.cache.detail.store(key, entry.clone());
        Ok(entry)
    }

    /// Every type name, fetched once per session.
    pub async fn type_names(&mut self) -> Result<Vec<String>, GatewayError> {
        if let Some(names) = self.cache.type_names.get(&QueryKey::TypeNames) {
            return Ok(names.clone());
        }
        let cancel = self.generation.clone();
        let names = self.source.fetch_type_names(&cancel).await?;
        self.cache.type_names.store(QueryKey::TypeNames, names.clone());
        Ok(names)
    }
}
