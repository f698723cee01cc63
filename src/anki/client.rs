//! Blocking AnkiConnect HTTP client.

use super::AnkiBackend;
use super::types::{
    API_VERSION, ApiRequest, ApiResponse, CardId, CardQuery, DeckCounts, ReviewEvent,
    decode_deck_stats, decode_reviews,
};
use crate::config::AnkiConnectConfig;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// Builds a blocking HTTP client with configured timeouts.
pub fn build_http_client(config: &AnkiConnectConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to build AnkiConnect HTTP client; using defaults");
        reqwest::blocking::Client::new()
    })
}

/// AnkiConnect client.
pub struct AnkiConnectClient {
    /// Endpoint URL.
    endpoint: String,
    /// Optional API key.
    api_key: Option<String>,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl AnkiConnectClient {
    /// Creates a client for the default local endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&AnkiConnectConfig::default())
    }

    /// Creates a client from configuration.
    #[must_use]
    pub fn from_config(config: &AnkiConnectConfig) -> Self {
        Self {
            endpoint: config.url.clone(),
            api_key: config.api_key.clone(),
            client: build_http_client(config),
        }
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invokes an action and returns its raw `result` value.
    fn invoke_raw<P: Serialize>(&self, action: &str, params: P) -> Result<Value> {
        let request = ApiRequest {
            action,
            version: API_VERSION,
            params,
            key: self.api_key.as_deref(),
        };
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    action,
                    endpoint = %self.endpoint,
                    error = %e,
                    error_kind,
                    "AnkiConnect request failed"
                );
                record_request(action, "unavailable", start);
                Error::UpstreamUnavailable {
                    operation: action.to_string(),
                    cause: format!("{error_kind} error: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(action, status = %status, body = %body, "AnkiConnect returned error status");
            record_request(action, "unavailable", start);
            return Err(Error::UpstreamUnavailable {
                operation: action.to_string(),
                cause: format!("HTTP status {status}: {body}"),
            });
        }

        let body = response.text().map_err(|e| {
            record_request(action, "unavailable", start);
            Error::UpstreamUnavailable {
                operation: action.to_string(),
                cause: e.to_string(),
            }
        })?;

        let result = decode_envelope(action, &body);
        record_request(
            action,
            if result.is_ok() { "success" } else { "error" },
            start,
        );
        tracing::debug!(
            action,
            elapsed_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "AnkiConnect action completed"
        );
        result
    }

    /// Invokes an action and decodes its result into `R`.
    fn invoke<P: Serialize, R: DeserializeOwned>(&self, action: &str, params: P) -> Result<R> {
        let value = self.invoke_raw(action, params)?;
        decode_result(action, value)
    }
}

impl Default for AnkiConnectClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnkiBackend for AnkiConnectClient {
    fn version(&self) -> Result<u32> {
        self.invoke("version", json!({}))
    }

    fn deck_names(&self) -> Result<Vec<String>> {
        self.invoke("deckNames", json!({}))
    }

    fn deck_counts(&self, decks: &[String]) -> Result<Vec<DeckCounts>> {
        let value = self.invoke_raw("getDeckStats", json!({ "decks": decks }))?;
        decode_deck_stats(value)
    }

    fn find_cards(&self, query: &CardQuery) -> Result<Vec<CardId>> {
        self.invoke("findCards", json!({ "query": query.to_search() }))
    }

    fn ease_factors(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        self.invoke("getEaseFactors", json!({ "cards": cards }))
    }

    fn intervals(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        self.invoke("getIntervals", json!({ "cards": cards }))
    }

    fn card_reviews(&self, deck: &str, start_ms: i64) -> Result<Vec<ReviewEvent>> {
        // `startID` is exclusive upstream.
        let start_id = start_ms.saturating_sub(1);
        let value = self.invoke_raw("cardReviews", json!({ "deck": deck, "startID": start_id }))?;
        decode_reviews(value)
    }
}

/// Parses the response envelope and unwraps `result`.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body is not an envelope and
/// [`Error::Upstream`] if AnkiConnect reported an error.
pub fn decode_envelope(action: &str, body: &str) -> Result<Value> {
    let envelope: ApiResponse =
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse {
            operation: action.to_string(),
            cause: format!("response is not an AnkiConnect envelope: {e}"),
        })?;

    match envelope.error {
        Some(message) => {
            tracing::warn!(action, error = %message, "AnkiConnect reported an error");
            Err(Error::Upstream {
                action: action.to_string(),
                message,
            })
        },
        None => Ok(envelope.result),
    }
}

/// Decodes a `result` value into the expected type.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] when the shape does not match.
pub fn decode_result<R: DeserializeOwned>(action: &str, value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| Error::MalformedResponse {
        operation: action.to_string(),
        cause: e.to_string(),
    })
}

fn record_request(action: &str, status: &'static str, start: Instant) {
    metrics::counter!(
        "anki_requests_total",
        "action" => action.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("anki_request_duration_ms", "action" => action.to_string())
        .record(start.elapsed().as_secs_f64() * 1000.0);
}
