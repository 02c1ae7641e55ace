//! Per-query result cache.
//!
//! Each logical query (listing page, search, type members, detail batch,
//! single detail, type index) owns one slot holding the last successful
//! result and the key it was fetched for. A slot is replaced when its
//! key changes and dropped only on explicit invalidation; failures are
//! never stored.

use std::fmt;

use pokedex_core::types::{Entry, EntryId, ListPage, TypeMembers};

/// Composite of resource kind and parameters identifying a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    TypeNames,
    List { limit: usize, offset: usize },
    /// Normalized (trimmed, lowercased) search term.
    Search(String),
    TypeMembers(String),
    /// Candidate ids in request order.
    Batch(Vec<EntryId>),
    Detail(String),
}

impl QueryKey {
    pub fn search(query: &str) -> Self {
        Self::Search(query.trim().to_lowercase())
    }

    pub fn detail(id_or_name: &str) -> Self {
        Self::Detail(id_or_name.trim().to_lowercase())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNames => write!(f, "types"),
            Self::List { limit, offset } => write!(f, "list?limit={limit}&offset={offset}"),
            Self::Search(term) => write!(f, "search/{term}"),
            Self::TypeMembers(name) => write!(f, "type/{name}"),
            Self::Batch(ids) => write!(f, "batch[{}]", ids.len()),
            Self::Detail(key) => write!(f, "pokemon/{key}"),
        }
    }
}

/// Last successful result for one logical query.
#[derive(Debug, Clone)]
pub struct QuerySlot<V> {
    entry: Option<(QueryKey, V)>,
}

impl<V> Default for QuerySlot<V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<V> QuerySlot<V> {
    /// The cached value if it was fetched for `key`.
    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        match &self.entry {
            Some((cached, value)) if cached == key => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            _ => None,
        }
    }

    pub fn store(&mut self, key: QueryKey, value: V) {
        if let Some((previous, _)) = &self.entry {
            if *previous != key {
                tracing::debug!(previous = %previous, key = %key, "Replacing cached query");
            }
        }
        self.entry = Some((key, value));
    }

    pub fn invalidate(&mut self) {
        if let Some((key, _)) = self.entry.take() {
            tracing::debug!(key = %key, "Cache invalidated");
        }
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.entry.as_ref().map(|(key, _)| key)
    }
}

/// One slot per logical query the catalog issues.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    pub type_names: QuerySlot<Vec<String>>,
    pub list: QuerySlot<ListPage>,
    pub search: QuerySlot<Option<Entry>>,
    pub type_members: QuerySlot<TypeMembers>,
    pub batch: QuerySlot<Vec<Entry>>,
    pub detail: QuerySlot<Entry>,
}

impl QueryCache {
    /// Drop everything the result list depends on.
    pub fn invalidate_results(&mut self) {
        self.list.invalidate();
        self.search.invalidate();
        self.type_members.invalidate();
        self.batch.invalidate();
    }
}
