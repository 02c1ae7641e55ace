//! REST client for the PokéAPI HTTP endpoints.
//!
//! Wraps the read-only endpoints the catalog uses (`/pokemon`,
//! `/pokemon/{id or name}`, `/type/{name}`, `/type`) using [`reqwest`].
//! Every request races the caller's [`CancellationToken`] and the
//! configured timeout; cancellation wins ties so an aborted request is
//! never reported as a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use pokedex_core::types::{Entry, ListPage, TypeMembers};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::schema::{RawListResponse, RawNamedList, RawPokemon, RawTypeResponse};
use crate::source::PokemonSource;

/// Upper bound for the type index request; upstream has ~20 types.
const TYPE_INDEX_LIMIT: usize = 100;

/// HTTP client for a PokéAPI-compatible server.
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl PokeApi {
    /// Create a client from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Self::with_client(client, config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: &GatewayConfig,
    ) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!("{} cannot be a base URL", config.base_url)));
        }
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    // ---- private helpers ----

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the body, bounded by cancellation and timeout.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
        cancel: &CancellationToken,
    ) -> Result<T, GatewayError> {
        let request = async {
            let response = self.client.get(url.clone()).send().await?;
            Self::parse_response(response, resource).await
        };

        tracing::debug!(url = %url, "GET");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(resource, "Request cancelled");
                Err(GatewayError::Cancelled)
            }
            outcome = tokio::time::timeout(self.timeout, request) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(url = %url, timeout = ?self.timeout, "Request timed out");
                    Err(GatewayError::Timeout {
                        url: url.to_string(),
                        timeout: self.timeout,
                    })
                }
            },
        }
    }

    /// Check the status, then decode the JSON body. A body that does not
    /// match `T` is a [`GatewayError::Decode`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response, resource).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                GatewayError::Decode {
                    resource: resource.to_string(),
                    reason: e.to_string(),
                }
            } else {
                GatewayError::Request(e)
            }
        })
    }

    /// Map non-2xx statuses: client errors are "not found", anything
    /// else is a server-side failure carrying the body for debugging.
    async fn ensure_success(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.is_client_error() {
            if status != StatusCode::NOT_FOUND {
                tracing::debug!(
                    resource,
                    status = status.as_u16(),
                    "Client error treated as not found"
                );
            }
            return Err(GatewayError::NotFound {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(GatewayError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PokemonSource for PokeApi {
    async fn fetch_list(
        &self,
        limit: usize,
        offset: usize,
        cancel: &CancellationToken,
    ) -> Result<ListPage, GatewayError> {
        let mut url = self.endpoint(&["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let raw: RawListResponse = self.get_json(url, "pokemon list", cancel).await?;
        Ok(raw.into())
    }

    async fn fetch_by_id(
        &self,
        id_or_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Entry, GatewayError> {
        let resource = format!("pokemon/{id_or_name}");
        let url = self.endpoint(&["pokemon", id_or_name])?;
        let raw: RawPokemon = self.get_json(url, &resource, cancel).await?;
        Entry::try_from(raw).map_err(|e| GatewayError::Decode {
            resource,
            reason: e.to_string(),
        })
    }

    async fn fetch_by_type(
        &self,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> Result<TypeMembers, GatewayError> {
        let resource = format!("type/{type_name}");
        let url = self.endpoint(&["type", type_name])?;
        let raw: RawTypeResponse = self.get_json(url, &resource, cancel).await?;
        Ok(raw.into())
    }

    async fn fetch_type_names(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, GatewayError> {
        let mut url = self.endpoint(&["type"])?;
        url.query_pairs_mut()
            .append_pair("limit", &TYPE_INDEX_LIMIT.to_string());
        let raw: RawNamedList = self.get_json(url, "type index", cancel).await?;
        Ok(raw.names())
    }
}
