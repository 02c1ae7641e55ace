//! Integration tests for the PokéAPI REST client over real HTTP.
//!
//! Verifies payload decoding, status mapping (404 and other client errors
//! to not-found, 5xx and timeouts to transport), cancellation and batch
//! partial failures against the fixture server in `common`.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use tokio_util::sync::CancellationToken;

use pokedex_core::types::ids_of;
use pokedex_pokeapi::error::{ErrorKind, GatewayError};
use pokedex_pokeapi::source::PokemonSource;

use common::{BROKEN_ID, SLOW_ID, TOTAL};

const TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Test: listing and lookups decode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_page_respects_limit_and_offset() {
    let (addr, fixture) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let page = api.fetch_list(20, 40, &CancellationToken::new()).await.unwrap();

    assert_eq!(page.count, TOTAL);
    assert_eq!(ids_of(&page.results), (41..=TOTAL).collect::<Vec<_>>());
    assert_eq!(fixture.list_hits(), 1);
}

#[tokio::test]
async fn lookup_by_name_and_by_id_agree() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);
    let cancel = CancellationToken::new();

    let by_name = api.fetch_by_id("pikachu", &cancel).await.unwrap();
    let by_id = api.fetch_by_id("25", &cancel).await.unwrap();

    assert_eq!(by_name, by_id);
    assert_eq!(by_name.types, vec!["water"]);
    assert_eq!(by_name.image_url(), "https://img.test/25.png");
    assert_eq!(by_name.stats[1].name, "special-attack");
}

#[tokio::test]
async fn type_members_and_index() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);
    let cancel = CancellationToken::new();

    let fire = api.fetch_by_type("fire", &cancel).await.unwrap();
    assert_eq!(fire.name, "fire");
    assert_eq!(ids_of(&fire.members).len(), 15);
    assert!(ids_of(&fire.members).iter().all(|id| id % 3 == 0));

    let names = api.fetch_type_names(&cancel).await.unwrap();
    assert_eq!(names, vec!["fire", "water"]);
}

// ---------------------------------------------------------------------------
// Test: status mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_entry_is_not_found() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let err = api.fetch_by_id("missingno", &CancellationToken::new()).await.unwrap_err();
    assert_matches!(err, GatewayError::NotFound { status: 404, .. });
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn other_client_errors_are_not_found() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let err = api.fetch_by_id("teapot", &CancellationToken::new()).await.unwrap_err();
    assert_matches!(err, GatewayError::NotFound { status: 418, .. });
}

#[tokio::test]
async fn server_error_is_transport() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let err = api
        .fetch_by_id(&BROKEN_ID.to_string(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(&err, GatewayError::Api { status: 500, body } if body == "boom");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let err = api.fetch_by_id("garbled", &CancellationToken::new()).await.unwrap_err();
    assert_matches!(
        err,
        GatewayError::Decode { ref resource, .. } if resource == "pokemon/garbled"
    );
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unknown_type_is_not_found() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let err = api.fetch_by_type("shadow", &CancellationToken::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unreachable_server_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = common::gateway(addr, TIMEOUT);
    let err = api.fetch_list(20, 0, &CancellationToken::new()).await.unwrap_err();
    assert_matches!(err, GatewayError::Request(_));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

// ---------------------------------------------------------------------------
// Test: timeout and cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_response_times_out_as_transport() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, Duration::from_millis(200));

    let err = api.fetch_by_id("slowpoke", &CancellationToken::new()).await.unwrap_err();
    assert_matches!(err, GatewayError::Timeout { .. });
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);
    let cancel = CancellationToken::new();

    let key = SLOW_ID.to_string();
    let started = tokio::time::Instant::now();
    let (result, _) = tokio::join!(api.fetch_by_id(&key, &cancel), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    assert_matches!(result, Err(GatewayError::Cancelled));
    assert!(started.elapsed() < common::SLOW_DELAY);
}

#[tokio::test]
async fn cancellation_wins_over_timeout() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, Duration::from_millis(1));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = api.fetch_by_id("slowpoke", &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

// ---------------------------------------------------------------------------
// Test: batch and search semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_keeps_successes_in_request_order() {
    let (addr, fixture) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let entries = api
        .fetch_batch(&[25, BROKEN_ID, 999, 1], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![25, 1]);
    assert_eq!(fixture.detail_hits(), 4);
}

#[tokio::test]
async fn search_maps_not_found_to_none() {
    let (addr, fixture) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);
    let cancel = CancellationToken::new();

    let found = api.resolve_search("  PIKACHU ", &cancel).await.unwrap();
    assert_eq!(found.map(|e| e.id), Some(25));

    assert_eq!(api.resolve_search("mr mime", &cancel).await.unwrap(), None);
    assert_eq!(api.resolve_search("", &cancel).await.unwrap(), None);
    assert_eq!(fixture.detail_hits(), 2);
}

#[tokio::test]
async fn search_transport_failure_is_an_error() {
    let (addr, _) = common::spawn().await;
    let api = common::gateway(addr, TIMEOUT);

    let result = api.resolve_search(&BROKEN_ID.to_string(), &CancellationToken::new()).await;
    assert_matches!(result, Err(e) if e.kind() == ErrorKind::Transport);
}
