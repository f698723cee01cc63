//! Tool execution handlers.
//!
//! Each handler validates its arguments, runs one service operation and
//! returns the result as pretty-printed JSON.

use crate::Result;
use crate::anki::AnkiBackend;
use crate::mcp::tool_types::{
    CollectionStatsArgs, DeckStatsArgs, NoArgs, ReviewHistoryArgs, parse_args,
};
use crate::services::StatsService;
use serde::Serialize;
use serde_json::Value;

use super::ToolResult;

type Service<'a> = StatsService<&'a dyn AnkiBackend>;

/// Executes the `deck_stats` tool.
pub fn execute_deck_stats(service: &Service<'_>, arguments: Value) -> Result<ToolResult> {
    let request = parse_args::<DeckStatsArgs>(arguments)?.into_request()?;
    ToolResult::json(&service.deck_stats(&request)?)
}

/// Executes the `collection_stats` tool.
pub fn execute_collection_stats(service: &Service<'_>, arguments: Value) -> Result<ToolResult> {
    let request = parse_args::<CollectionStatsArgs>(arguments)?.into_request()?;
    ToolResult::json(&service.collection_stats(&request)?)
}

/// Executes the `review_history` tool.
pub fn execute_review_history(service: &Service<'_>, arguments: Value) -> Result<ToolResult> {
    let request = parse_args::<ReviewHistoryArgs>(arguments)?.into_request()?;
    ToolResult::json(&service.review_history(&request)?)
}

#[derive(Serialize)]
struct DeckList {
    count: usize,
    decks: Vec<String>,
}

/// Executes the `list_decks` tool.
pub fn execute_list_decks(service: &Service<'_>, arguments: Value) -> Result<ToolResult> {
    parse_args::<NoArgs>(arguments)?;
    let decks = service.list_decks()?;
    ToolResult::json(&DeckList {
        count: decks.len(),
        decks,
    })
}

#[derive(Serialize)]
struct AnkiStatus<'a> {
    connected: bool,
    endpoint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    anki_connect_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    server_version: &'static str,
}

/// Executes the `anki_status` tool.
///
/// An unreachable Anki is reported in the result rather than as a failure.
pub fn execute_anki_status(
    service: &Service<'_>,
    endpoint: &str,
    arguments: Value,
) -> Result<ToolResult> {
    parse_args::<NoArgs>(arguments)?;
    let (version, error) = match service.anki_version() {
        Ok(version) => (Some(version), None),
        Err(e) => {
            tracing::warn!(error = %e, "AnkiConnect status probe failed");
            (None, Some(e.to_string()))
        },
    };
    ToolResult::json(&AnkiStatus {
        connected: version.is_some(),
        endpoint,
        anki_connect_version: version,
        error,
        server_version: env!("CARGO_PKG_VERSION"),
    })
}
