//! End-to-end catalog sessions against the fixture server.
//!
//! Drives [`Catalog`] through URL-encoded filter states with the real
//! HTTP gateway and a file-backed favorites store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;

use pokedex_core::compose::NoMatch;
use pokedex_core::favorites::{FavoritesStore, JsonFileStorage};
use pokedex_core::filter::{FilterUpdate, SortKey};
use pokedex_core::location::{FilterLocation, MemoryHistory, Navigator};
use pokedex_core::view::Action;
use pokedex_pokeapi::api::PokeApi;
use pokedex_pokeapi::catalog::{execute, Catalog, Completion, ViewOutcome};
use pokedex_pokeapi::error::ErrorKind;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Session {
    catalog: Catalog<MemoryHistory>,
    fixture: common::Fixture,
    api: Arc<PokeApi>,
}

async fn session(location: &str, favorites: FavoritesStore) -> Session {
    let (addr, fixture) = common::spawn().await;
    let api = Arc::new(common::gateway(addr, TIMEOUT));
    let catalog = Catalog::new(
        api.clone(),
        FilterLocation::new(MemoryHistory::new(location)),
        favorites,
        20,
    );
    Session {
        catalog,
        fixture,
        api,
    }
}

fn no_favorites() -> FavoritesStore {
    FavoritesStore::load(pokedex_core::favorites::MemoryStorage::new())
}

fn shown(catalog: &Catalog<MemoryHistory>) -> Vec<u32> {
    catalog
        .view()
        .and_then(|v| v.page())
        .map(|p| p.entries.iter().map(|e| e.id).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Test: default listing and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn last_page_of_default_listing() {
    let Session { mut catalog, fixture, .. } = session("?page=3", no_favorites()).await;

    assert_eq!(catalog.refresh().await, Completion::Applied);
    assert_eq!(shown(&catalog), (41..=45).collect::<Vec<_>>());

    let page = catalog.view().unwrap().page().unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.upstream_count, Some(common::TOTAL));
    assert_eq!(fixture.list_hits(), 1);
    assert_eq!(fixture.detail_hits(), 5);
}

#[tokio::test]
async fn broken_entry_is_dropped_from_the_page() {
    let Session { mut catalog, .. } = session("", no_favorites()).await;

    catalog.refresh().await;
    let ids = shown(&catalog);
    assert_eq!(ids.len(), 19);
    assert!(!ids.contains(&common::BROKEN_ID));
}

// ---------------------------------------------------------------------------
// Test: search and type filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_within_wrong_type_reports_type_mismatch() {
    let Session { mut catalog, .. } = session("?query=pikachu&type=fire", no_favorites()).await;

    catalog.refresh().await;
    assert_matches!(
        &catalog.view().unwrap().outcome,
        ViewOutcome::NoMatch { reason: NoMatch::QueryInType, state }
            if state.actions == vec![Action::ClearSearch, Action::ClearType]
    );

    catalog.update_filters(&FilterUpdate::type_name("water"));
    catalog.refresh().await;
    assert_eq!(shown(&catalog), vec![25]);
}

#[tokio::test]
async fn type_filter_sorts_by_name() {
    let Session { mut catalog, .. } = session("?type=fire", no_favorites()).await;
    catalog.update_filters(&FilterUpdate::sort(SortKey::Name));
    assert_eq!(catalog.location().navigator().location(), "type=fire&sort=name");

    catalog.refresh().await;
    let page = catalog.view().unwrap().page().unwrap();
    let names: Vec<&str> = page.entries.iter().map(|e| e.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();

    assert_eq!(page.total_items, 15);
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn unknown_type_fails_with_retry() {
    let Session { mut catalog, .. } = session("?type=shadow", no_favorites()).await;

    catalog.refresh().await;
    assert_matches!(
        &catalog.view().unwrap().outcome,
        ViewOutcome::Failed { kind: ErrorKind::NotFound, state }
            if state.actions == vec![Action::Retry]
    );
}

// ---------------------------------------------------------------------------
// Test: favorites persist across sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn favorites_survive_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");

    let favorites = FavoritesStore::load(JsonFileStorage::new(&path));
    let Session { mut catalog, .. } = session("", favorites).await;
    for id in [7, 1, 4] {
        assert!(catalog.toggle_favorite(id));
    }
    drop(catalog);

    let favorites = FavoritesStore::load(JsonFileStorage::new(&path));
    let Session { mut catalog, .. } = session("?favorites=true", favorites).await;
    catalog.refresh().await;
    assert_eq!(shown(&catalog), vec![1, 4, 7]);

    assert!(!catalog.toggle_favorite(4));
    catalog.refresh().await;
    assert_eq!(shown(&catalog), vec![1, 7]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,7]");
}

// ---------------------------------------------------------------------------
// Test: superseded loads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn superseded_slow_search_is_aborted_and_rejected() {
    let Session { mut catalog, api, .. } = session("?query=slowpoke", no_favorites()).await;

    let slow = catalog.plan();
    catalog.update_filters(&FilterUpdate::query("pikachu"));

    let started = tokio::time::Instant::now();
    let late = execute(api.as_ref(), slow).await;
    assert!(started.elapsed() < common::SLOW_DELAY);
    assert_eq!(catalog.complete(late), Completion::Stale);

    catalog.refresh().await;
    assert_eq!(shown(&catalog), vec![25]);
}

