//! Fixture PokéAPI server for gateway integration tests.
//!
//! Serves a small generated catalog on an ephemeral port. A few ids are
//! wired to misbehave so failure mapping can be exercised over real HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use pokedex_pokeapi::api::PokeApi;
use pokedex_pokeapi::config::GatewayConfig;

/// Size of the generated listing.
pub const TOTAL: u32 = 45;
/// Answers only after [`SLOW_DELAY`].
pub const SLOW_ID: u32 = 79;
pub const SLOW_DELAY: Duration = Duration::from_secs(5);
/// Answers 500.
pub const BROKEN_ID: u32 = 13;

#[derive(Clone, Default)]
pub struct Fixture {
    /// Requests served by the detail endpoint.
    pub detail_hits: Arc<AtomicUsize>,
    /// Requests served by the list endpoint.
    pub list_hits: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn detail_hits(&self) -> usize {
        self.detail_hits.load(Ordering::SeqCst)
    }

    pub fn list_hits(&self) -> usize {
        self.list_hits.load(Ordering::SeqCst)
    }
}

pub fn name_of(id: u32) -> String {
    match id {
        25 => "pikachu".into(),
        SLOW_ID => "slowpoke".into(),
        _ => format!("mon-{id}"),
    }
}

pub fn type_of(id: u32) -> &'static str {
    if id % 3 == 0 {
        "fire"
    } else {
        "water"
    }
}

fn resource_url(kind: &str, id: u32) -> String {
    format!("https://pokeapi.co/api/v2/{kind}/{id}/")
}

fn pokemon_json(id: u32) -> Value {
    json!({
        "id": id,
        "name": name_of(id),
        "height": id,
        "weight": id * 10,
        "base_experience": 50 + id,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "other": { "official-artwork": { "front_default": null } }
        },
        "types": [ { "slot": 1, "type": { "name": type_of(id), "url": "" } } ],
        "stats": [
            { "base_stat": 40 + id, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 60, "effort": 1, "stat": { "name": "special-attack", "url": "" } }
        ],
        "abilities": [
            { "ability": { "name": "static", "url": "" }, "is_hidden": false, "slot": 1 }
        ]
    })
}

fn lookup(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .or_else(|| (1..=TOTAL).chain([SLOW_ID]).find(|id| name_of(*id) == key))
}

async fn list(
    State(fixture): State<Fixture>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    fixture.list_hits.fetch_add(1, Ordering::SeqCst);
    let limit: u32 = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: u32 = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);

    let results: Vec<Value> = (offset + 1..=TOTAL)
        .take(limit as usize)
        .map(|id| json!({ "name": name_of(id), "url": resource_url("pokemon", id) }))
        .collect();

    Json(json!({ "count": TOTAL, "next": null, "previous": null, "results": results }))
}

async fn pokemon(State(fixture): State<Fixture>, Path(key): Path<String>) -> Response {
    fixture.detail_hits.fetch_add(1, Ordering::SeqCst);
    if key == "teapot" {
        return (StatusCode::IM_A_TEAPOT, "short and stout").into_response();
    }
    if key == "garbled" {
        return (StatusCode::OK, "{\"id\": \"not a number\"").into_response();
    }
    match lookup(&key) {
        Some(BROKEN_ID) => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Some(SLOW_ID) => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(pokemon_json(SLOW_ID)).into_response()
        }
        Some(id) if (1..=TOTAL).contains(&id) => Json(pokemon_json(id)).into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn type_members(Path(name): Path<String>) -> Response {
    if name != "fire" && name != "water" {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    let members: Vec<Value> = (1..=TOTAL)
        .filter(|id| type_of(*id) == name)
        .map(|id| {
            json!({
                "pokemon": { "name": name_of(id), "url": resource_url("pokemon", id) },
                "slot": 1
            })
        })
        .collect();
    let id = if name == "fire" { 10 } else { 11 };
    Json(json!({ "id": id, "name": name, "pokemon": members })).into_response()
}

async fn type_index() -> Json<Value> {
    Json(json!({
        "count": 2,
        "results": [
            { "name": "fire", "url": resource_url("type", 10) },
            { "name": "water", "url": resource_url("type", 11) }
        ]
    }))
}

/// Start the fixture server on an ephemeral port.
pub async fn spawn() -> (SocketAddr, Fixture) {
    let fixture = Fixture::default();
    let app = Router::new()
        .route("/api/v2/pokemon", get(list))
        .route("/api/v2/pokemon/{key}", get(pokemon))
        .route("/api/v2/type", get(type_index))
        .route("/api/v2/type/{name}", get(type_members))
        .with_state(fixture.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, fixture)
}

/// Gateway pointed at the fixture server.
pub fn gateway(addr: SocketAddr, timeout: Duration) -> PokeApi {
    PokeApi::new(&GatewayConfig {
        base_url: format!("http://{addr}/api/v2"),
        timeout,
        ..GatewayConfig::default()
    })
    .expect("fixture gateway should build")
}
