//! The remote data seam the catalog is written against.
//!
//! [`PokeApi`](crate::api::PokeApi) is the production implementation;
//! tests substitute in-memory sources. Batch fetching and search
//! resolution are provided methods built on the single-entry lookup so
//! every source gets the same failure semantics.

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use pokedex_core::types::{Entry, EntryId, ListPage, TypeMembers};

use crate::error::GatewayError;

#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// One page of the default ordered listing.
    async fn fetch_list(
        &self,
        limit: usize,
        offset: usize,
        cancel: &CancellationToken,
    ) -> Result<ListPage, GatewayError>;

    /// Full record by numeric id or lowercase name.
    async fn fetch_by_id(
        &self,
        id_or_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Entry, GatewayError>;

    /// Members of one type.
    async fn fetch_by_type(
        &self,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> Result<TypeMembers, GatewayError>;

    /// Every type name the source knows.
    async fn fetch_type_names(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, GatewayError>;

    /// Fetch full records for `ids` concurrently.
    ///
    /// Successes come back in request order. Individual failures are
    /// logged and dropped, so the result may be shorter than `ids`. The
    /// whole batch fails only when cancelled, in which case no partial
    /// result is returned.
    async fn fetch_batch(
        &self,
        ids: &[EntryId],
        cancel: &CancellationToken,
    ) -> Result<Vec<Entry>, GatewayError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = join_all(ids.iter().map(|id| async move {
            let key = id.to_string();
            (*id, self.fetch_by_id(&key, cancel).await)
        }))
        .await;

        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        let requested = ids.len();
        let entries: Vec<Entry> = results
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(id, error = %e, "Dropping entry from batch");
                    None
                }
            })
            .collect();

        tracing::debug!(requested, fetched = entries.len(), "Batch fetch complete");
        Ok(entries)
    }

    /// Resolve a free-text query to at most one entry.
    ///
    /// The query is trimmed and lowercased. A blank query resolves to
    /// `None` without a request, as does a not-found response. Transport
    /// failures propagate.
    async fn resolve_search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Entry>, GatewayError> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Ok(None);
        }

        match self.fetch_by_id(&term, cancel).await {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(query = %term, "Search matched nothing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
