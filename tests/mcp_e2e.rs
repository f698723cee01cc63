//! MCP server end-to-end tests.
//!
//! Drives the tool registry and the JSON-RPC server against an in-memory
//! Anki backend, focusing on:
//! - Tool registration and discovery
//! - Tool execution and the JSON shapes clients rely on
//! - Error handling and error response format
//! - JSON-RPC request/response format compliance

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args
)]

mod common;

use ankistat::mcp::{McpServer, ToolContent, ToolRegistry, ToolResult};
use common::{FakeAnki, at};
use serde_json::{Value, json};

fn spanish() -> FakeAnki {
    FakeAnki::new()
        .with_deck("Spanish", 2, 1, 3)
        .with_deck("Empty", 0, 0, 0)
        .with_cards(&[4100, 2500, 3000, 0], &[10, 10, 100, -600])
        .with_review(at(2024, 3, 1, 9), 3)
        .with_review(at(2024, 3, 2, 9), 1)
}

fn registry(anki: FakeAnki) -> ToolRegistry {
    ToolRegistry::new(Box::new(anki), "http://localhost:8765")
}

fn payload(result: &ToolResult) -> Value {
    let ToolContent::Text { text } = &result.content[0];
    serde_json::from_str(text).unwrap()
}

// ============================================================================
// Tool Registry Tests
// ============================================================================

mod tool_registry {
    use super::*;

    #[test]
    fn test_tool_definitions_have_required_fields() {
        let registry = registry(FakeAnki::new());

        assert_eq!(registry.list_tools().len(), 5);
        for tool in registry.list_tools() {
            assert!(!tool.description.is_empty(), "{} needs a description", tool.name);
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["properties"].is_object(), "{}", tool.name);
            assert_eq!(tool.input_schema["additionalProperties"], false, "{}", tool.name);
        }
    }

    #[test]
    fn test_deck_stats_result_shape() {
        let result = registry(spanish())
            .execute("deck_stats", json!({"deck": "Spanish"}))
            .unwrap();
        let value = payload(&result);

        assert_eq!(value["deck"], "Spanish");
        assert_eq!(value["counts"]["total"], 6);
        assert_eq!(value["ease"]["count"], 3);
        assert_eq!(value["intervals"]["count"], 3);

        let labels: Vec<&String> = value["ease"]["buckets"].as_object().unwrap().keys().collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(value["ease"]["buckets"][">3.0"], 2);
        assert_eq!(value["intervals"]["buckets"]["7-21d"], 2);
        assert_eq!(value["intervals"]["buckets"]["21-90d"], 0);
        assert_eq!(value["intervals"]["buckets"][">90d"], 1);
    }

    #[test]
    fn test_histogram_keeps_boundary_order() {
        let result = registry(spanish())
            .execute("deck_stats", json!({"deck": "Spanish", "intervalBuckets": [100, 200]}))
            .unwrap();
        let ToolContent::Text { text } = &result.content[0];

        let first = text.find("\"<100d\"").unwrap();
        let middle = text.find("\"100-200d\"").unwrap();
        let last = text.find("\">200d\"").unwrap();
        assert!(first < middle && middle < last);
    }

    #[test]
    fn test_collection_stats_breakdown() {
        let value = payload(
            &registry(spanish())
                .execute("collection_stats", json!({}))
                .unwrap(),
        );

        assert_eq!(value["total_decks"], 2);
        assert_eq!(value["counts"]["total"], 6);
        assert_eq!(value["decks"][0]["deck"], "Empty");
        assert_eq!(value["decks"][1]["deck"], "Spanish");
    }

    #[test]
    fn test_review_history_shape() {
        let value = payload(
            &registry(spanish())
                .execute(
                    "review_history",
                    json!({"deck": "Spanish", "startDate": "2024-03-01", "endDate": "2024-03-07"}),
                )
                .unwrap(),
        );

        assert_eq!(value["period"]["start"], "2024-03-01");
        assert_eq!(value["period"]["end"], "2024-03-07");
        assert_eq!(value["summary"]["total_reviews"], 2);
        assert_eq!(value["summary"]["streak"], 2);
        assert_eq!(value["summary"]["best_day"]["date"], "2024-03-01");
        assert_eq!(value["retention"]["overall"], 0.5);
        assert_eq!(value["reviews_by_day"][1]["date"], "2024-03-02");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        let registry = registry(spanish());

        let err = registry
            .execute(
                "review_history",
                json!({"deck": "Spanish", "startDate": "2024-03-07", "endDate": "2024-03-01"}),
            )
            .unwrap_err();
        assert!(err.to_string().contains("before"));

        let err = registry
            .execute(
                "review_history",
                json!({"deck": "Spanish", "startDate": "March 1st"}),
            )
            .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_status_connected() {
        let value = payload(
            &registry(FakeAnki::new())
                .execute("anki_status", json!({}))
                .unwrap(),
        );

        assert_eq!(value["connected"], true);
        assert_eq!(value["anki_connect_version"], 6);
        assert!(value.get("error").is_none());
    }
}

// ============================================================================
// JSON-RPC Server Tests
// ============================================================================

mod json_rpc {
    use super::*;

    fn call(server: &McpServer, id: u64, name: &str, arguments: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        let response = server.handle_request(&request.to_string()).unwrap();
        serde_json::from_str(&response).unwrap()
    }

    #[test]
    fn test_session_over_serve() {
        let server = McpServer::new(registry(spanish()));
        let input = [
            json!({"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}),
            json!({"jsonrpc":"2.0","method":"notifications/initialized"}),
            json!({"jsonrpc":"2.0","id":2,"method":"tools/list"}),
            json!({"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"list_decks"}}),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "ankistat");
        assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 5);

        let text = responses[2]["result"]["content"][0]["text"].as_str().unwrap();
        let decks: Value = serde_json::from_str(text).unwrap();
        assert_eq!(decks["decks"], json!(["Empty", "Spanish"]));
    }

    #[test]
    fn test_tool_failure_is_error_result() {
        let server = McpServer::new(registry(spanish().offline()));
        let response = call(&server, 9, "deck_stats", json!({"deck": "Spanish"}));

        assert_eq!(response["id"], 9);
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("AnkiConnect unavailable"));
    }

    #[test]
    fn test_unknown_argument_is_error_result() {
        let server = McpServer::new(registry(spanish()));
        let response = call(&server, 1, "collection_stats", json!({"deck": "Spanish"}));

        assert_eq!(response["result"]["isError"], true);
    }

    #[test]
    fn test_bad_buckets_are_error_result() {
        let server = McpServer::new(registry(spanish()));
        let response = call(
            &server,
            1,
            "deck_stats",
            json!({"deck": "Spanish", "easeBuckets": [3.0, 2.0]}),
        );

        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("invalid input"));
    }

    #[test]
    fn test_response_echoes_string_ids() {
        let server = McpServer::new(registry(FakeAnki::new()));
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#)
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["result"], json!({}));
    }
}
