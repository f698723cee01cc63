//! MCP tool implementations.
//!
//! # Module Structure
//!
//! - [`definitions`]: Tool schema definitions (JSON Schema for input validation)
//! - [`handlers`]: Tool execution logic

mod definitions;
mod handlers;

use crate::anki::AnkiBackend;
use crate::services::StatsService;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Registry of MCP tools bound to an Anki backend.
pub struct ToolRegistry {
    /// Available tools.
    tools: HashMap<String, ToolDefinition>,
    /// Backend the statistics are read from.
    backend: Box<dyn AnkiBackend>,
    /// Endpoint reported by `anki_status`.
    endpoint: String,
}

impl ToolRegistry {
    /// Creates a registry with all ankistat tools.
    #[must_use]
    pub fn new(backend: Box<dyn AnkiBackend>, endpoint: impl Into<String>) -> Self {
        let tools = [
            definitions::deck_stats_tool(),
            definitions::collection_stats_tool(),
            definitions::review_history_tool(),
            definitions::list_decks_tool(),
            definitions::anki_status_tool(),
        ]
        .into_iter()
        .map(|tool| (tool.name.clone(), tool))
        .collect();

        Self {
            tools,
            backend,
            endpoint: endpoint.into(),
        }
    }

    /// Returns all tool definitions, sorted by name.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown tool, or the error of the
    /// underlying operation.
    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let service = StatsService::new(self.backend.as_ref());
        match name {
            "deck_stats" => handlers::execute_deck_stats(&service, arguments),
            "collection_stats" => handlers::execute_collection_stats(&service, arguments),
            "review_history" => handlers::execute_review_history(&service, arguments),
            "list_decks" => handlers::execute_list_decks(&service, arguments),
            "anki_status" => handlers::execute_anki_status(&service, &self.endpoint, arguments),
            _ => Err(Error::NotFound {
                kind: "tool",
                identifier: name.to_string(),
            }),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// A successful result holding `value` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let text = serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
            operation: "serialize_tool_result".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self {
            content: vec![ToolContent::Text { text }],
            is_error: false,
        })
    }

    /// An error result carrying a message for the client.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::{CardId, CardQuery, DeckCounts, ReviewEvent};

    struct Unreachable;

    impl AnkiBackend for Unreachable {
        fn version(&self) -> Result<u32> {
            Err(Error::UpstreamUnavailable {
                operation: "version".to_string(),
                cause: "connection refused".to_string(),
            })
        }
        fn deck_names(&self) -> Result<Vec<String>> {
            Ok(vec!["Zoology".to_string(), "Algebra".to_string()])
        }
        fn deck_counts(&self, _decks: &[String]) -> Result<Vec<DeckCounts>> {
            Ok(Vec::new())
        }
        fn find_cards(&self, _query: &CardQuery) -> Result<Vec<CardId>> {
            Ok(Vec::new())
        }
        fn ease_factors(&self, _cards: &[CardId]) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }
        fn intervals(&self, _cards: &[CardId]) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }
        fn card_reviews(&self, _deck: &str, _start_ms: i64) -> Result<Vec<ReviewEvent>> {
            Ok(Vec::new())
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Box::new(Unreachable), "http://127.0.0.1:8765")
    }

    fn text(result: &ToolResult) -> &str {
        match &result.content[0] {
            ToolContent::Text { text } => text,
        }
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = registry();
        let names: Vec<&str> = registry
            .list_tools()
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        assert_eq!(
            names,
            [
                "anki_status",
                "collection_stats",
                "deck_stats",
                "list_decks",
                "review_history"
            ]
        );
    }

    #[test]
    fn test_tool_definitions() {
        let registry = registry();

        let deck = registry.get_tool("deck_stats").unwrap();
        assert!(deck.description.contains("deck"));
        assert!(
            deck.input_schema["required"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("deck"))
        );

        let history = registry.get_tool("review_history").unwrap();
        assert_eq!(
            history.input_schema["required"],
            serde_json::json!(["deck", "startDate"])
        );
    }

    #[test]
    fn test_execute_list_decks_sorted() {
        let result = registry()
            .execute("list_decks", serde_json::json!({}))
            .unwrap();

        assert!(!result.is_error);
        let value: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["decks"], serde_json::json!(["Algebra", "Zoology"]));
    }

    #[test]
    fn test_execute_status_reports_unreachable() {
        let result = registry()
            .execute("anki_status", serde_json::json!({}))
            .unwrap();

        let value: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(value["connected"], false);
        assert_eq!(value["endpoint"], "http://127.0.0.1:8765");
        assert!(value["error"].as_str().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_execute_unknown_tool() {
        let err = registry()
            .execute("delete_deck", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "tool", .. }));
    }

    #[test]
    fn test_execute_missing_deck_is_not_found() {
        let err = registry()
            .execute("deck_stats", serde_json::json!({"deck": "Nope"}))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "deck", .. }));
    }

    #[test]
    fn test_execute_rejects_unknown_arguments() {
        let err = registry()
            .execute("list_decks", serde_json::json!({"verbose": true}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("boom");
        assert!(result.is_error);
        assert_eq!(text(&result), "boom");
    }
}
