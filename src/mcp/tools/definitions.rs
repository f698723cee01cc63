//! Tool definitions for MCP tools.
//!
//! Contains the JSON Schema definitions for all ankistat tools.

use super::ToolDefinition;
use serde_json::Value;

fn buckets_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "array",
        "items": { "type": "number", "exclusiveMinimum": 0 },
        "minItems": 1,
        "description": description
    })
}

/// Defines the deck statistics tool.
pub fn deck_stats_tool() -> ToolDefinition {
    ToolDefinition {
        name: "deck_stats".to_string(),
        description: "Card counts plus ease-factor and review-interval distributions for one deck"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "deck": {
                    "type": "string",
                    "description": "Full deck name, e.g. \"Spanish::Verbs\""
                },
                "easeBuckets": buckets_schema(
                    "Ascending ease boundaries (default: [2.0, 2.5, 3.0])"
                ),
                "intervalBuckets": buckets_schema(
                    "Ascending interval boundaries in days (default: [7, 21, 90])"
                )
            },
            "required": ["deck"],
            "additionalProperties": false
        }),
    }
}

/// Defines the collection statistics tool.
pub fn collection_stats_tool() -> ToolDefinition {
    ToolDefinition {
        name: "collection_stats".to_string(),
        description: "Aggregate card counts and distributions across every deck, with a per-deck breakdown"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "easeBuckets": buckets_schema(
                    "Ascending ease boundaries (default: [2.0, 2.5, 3.0])"
                ),
                "intervalBuckets": buckets_schema(
                    "Ascending interval boundaries in days (default: [7, 21, 90])"
                )
            },
            "additionalProperties": false
        }),
    }
}

/// Defines the review history tool.
pub fn review_history_tool() -> ToolDefinition {
    ToolDefinition {
        name: "review_history".to_string(),
        description: "Daily review counts, retention and study streak for a deck over a UTC date window"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "deck": {
                    "type": "string",
                    "description": "Full deck name"
                },
                "startDate": {
                    "type": "string",
                    "format": "date",
                    "description": "First day (inclusive), YYYY-MM-DD"
                },
                "endDate": {
                    "type": "string",
                    "format": "date",
                    "description": "Last day (inclusive), YYYY-MM-DD; defaults to today (UTC)"
                }
            },
            "required": ["deck", "startDate"],
            "additionalProperties": false
        }),
    }
}

/// Defines the deck listing tool.
pub fn list_decks_tool() -> ToolDefinition {
    ToolDefinition {
        name: "list_decks".to_string(),
        description: "List the names of every deck in the collection".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}

/// Defines the connectivity status tool.
pub fn anki_status_tool() -> ToolDefinition {
    ToolDefinition {
        name: "anki_status".to_string(),
        description: "Check that Anki is running and report the AnkiConnect endpoint and version"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}
