//! PokéAPI gateway and catalog orchestration.
//!
//! Provides the typed REST client for the remote data source, the
//! [`PokemonSource`](source::PokemonSource) seam the catalog is written
//! against, per-query result caching, and the [`Catalog`](catalog::Catalog)
//! session that turns filter state into a displayable page while
//! cancelling superseded fetches and rejecting stale responses.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod schema;
pub mod source;
