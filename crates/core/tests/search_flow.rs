//! Integration tests for the search box flow: typed input is debounced,
//! committed into the filter location, and undone by history navigation.

use std::time::{Duration, Instant};

use pokedex_core::debounce::Debouncer;
use pokedex_core::filter::{FilterState, FilterUpdate, SortKey};
use pokedex_core::location::{FilterLocation, MemoryHistory, Navigator};

// ---------------------------------------------------------------------------
// Test: debounced commit resets the page and lands in history
// ---------------------------------------------------------------------------

#[test]
fn committed_search_resets_page_and_can_be_undone() {
    let mut location = FilterLocation::new(MemoryHistory::new("?sort=name&page=4"));
    let mut input = Debouncer::new(location.read().query, Duration::from_millis(800));
    let start = Instant::now();

    for (offset, typed) in [(0, "p"), (150, "pi"), (300, "pik")] {
        input.input(typed, start + Duration::from_millis(offset));
        assert_eq!(input.poll(start + Duration::from_millis(offset + 100)), None);
    }
    let committed = input.poll(start + Duration::from_millis(1100)).expect("input settled");
    let state = location.apply(&FilterUpdate::query(committed));

    assert_eq!(state.query, "pik");
    assert_eq!(state.sort, SortKey::Name);
    assert_eq!(state.page, 1);
    assert_eq!(location.navigator().location(), "query=pik&sort=name");

    assert!(location.navigator_mut().back());
    assert_eq!(location.read().page, 4);
}

// ---------------------------------------------------------------------------
// Test: "Clear All" overrides text that was typed but not committed
// ---------------------------------------------------------------------------

#[test]
fn clear_all_discards_pending_input() {
    let mut location = FilterLocation::new(MemoryHistory::new("query=pikachu&type=electric"));
    let mut input = Debouncer::new(location.read().query, Duration::from_millis(800));
    let start = Instant::now();

    input.input("pikach", start);
    let state = location.apply(&FilterUpdate::clear_all());
    input.sync_external(state.query.clone());

    assert_eq!(state, FilterState::default());
    assert_eq!(input.transient(), "");
    assert_eq!(input.poll(start + Duration::from_secs(5)), None);
    assert_eq!(location.navigator().location(), "");
}
