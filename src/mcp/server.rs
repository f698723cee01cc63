//! MCP server setup and lifecycle.
//!
//! Implements line-delimited JSON-RPC 2.0 over stdio. Every tool is
//! read-only, so the server holds no mutable state between requests.

use super::dispatch::McpMethod;
use crate::mcp::ToolRegistry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::info_span;

/// Maximum request size (1 MiB).
const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// MCP protocol version.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name.
const SERVER_NAME: &str = "ankistat";

/// JSON-RPC error codes.
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// MCP server for ankistat.
pub struct McpServer {
    /// Tool registry.
    tools: ToolRegistry,
}

impl McpServer {
    /// Creates a server exposing `tools`.
    #[must_use]
    pub const fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// Serves requests from stdin until it closes.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or stdout cannot be written.
    pub fn run_stdio(&self) -> Result<()> {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting MCP server on stdio");
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        self.serve(stdin.lock(), &mut stdout)
    }

    /// Serves line-delimited requests from `reader`, writing responses to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, writer: &mut W) -> Result<()> {
        for line in reader.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_request(&line) else {
                continue;
            };

            writeln!(writer, "{response}").map_err(|e| Error::OperationFailed {
                operation: "write_stdout".to_string(),
                cause: e.to_string(),
            })?;
            writer.flush().map_err(|e| Error::OperationFailed {
                operation: "flush_stdout".to_string(),
                cause: e.to_string(),
            })?;
        }

        tracing::info!("Input closed; MCP server stopping");
        Ok(())
    }

    /// Handles a JSON-RPC request.
    ///
    /// Returns `None` for notifications, which get no response.
    pub fn handle_request(&self, request: &str) -> Option<String> {
        if request.len() > MAX_REQUEST_BODY_SIZE {
            tracing::warn!(
                request_size = request.len(),
                max_size = MAX_REQUEST_BODY_SIZE,
                "Request exceeds maximum size limit"
            );
            return Some(format_error(
                None,
                INVALID_REQUEST,
                &format!(
                    "Request too large: {} bytes (max: {MAX_REQUEST_BODY_SIZE} bytes)",
                    request.len()
                ),
            ));
        }

        let start = Instant::now();
        let span = info_span!(
            "mcp.request",
            rpc.method = tracing::field::Empty,
            rpc.id = tracing::field::Empty,
            status = tracing::field::Empty
        );
        let _guard = span.enter();

        let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(request);
        let mut method_label = "parse_error".to_string();
        let mut status_label = "error";

        let response = match parsed {
            Ok(req) => {
                method_label.clone_from(&req.method);
                span.record("rpc.method", method_label.as_str());
                if let Some(id) = &req.id {
                    span.record("rpc.id", id.to_string().as_str());
                }

                let method = McpMethod::from(req.method.as_str());
                if req.id.is_none() || method.is_notification() {
                    tracing::debug!(method = %method, "Received notification");
                    status_label = "notification";
                    span.record("status", status_label);
                    None
                } else {
                    tracing::info!(method = %method, "Processing MCP request");
                    let result = self.dispatch_method(method, req.params);
                    status_label = if result.is_ok() { "success" } else { "error" };
                    span.record("status", status_label);
                    Some(format_response(req.id, result))
                }
            },
            Err(e) => {
                span.record("status", "parse_error");
                Some(format_error(None, PARSE_ERROR, &format!("Parse error: {e}")))
            },
        };

        metrics::counter!(
            "mcp_requests_total",
            "method" => method_label.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!("mcp_request_duration_ms", "method" => method_label)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        response
    }

    fn dispatch_method(&self, method: McpMethod, params: Option<Value>) -> DispatchResult {
        match method {
            McpMethod::Initialize => Ok(Self::handle_initialize()),
            McpMethod::ListTools => Ok(self.handle_list_tools()),
            McpMethod::CallTool => self.handle_call_tool(params),
            McpMethod::Ping => Ok(serde_json::json!({})),
            McpMethod::Initialized | McpMethod::Cancelled => Ok(Value::Null),
            McpMethod::Unknown(name) => Err((METHOD_NOT_FOUND, format!("Method not found: {name}"))),
        }
    }

    fn handle_initialize() -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn handle_list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .list_tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        serde_json::json!({ "tools": tools })
    }

    /// Handles tools/call.
    ///
    /// Tool failures are reported in the result with `isError`, so the model
    /// sees the message; only protocol problems become JSON-RPC errors.
    fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((INVALID_PARAMS, "Missing params".to_string()))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;
        if self.tools.get_tool(name).is_none() {
            return Err((INVALID_PARAMS, format!("Unknown tool: {name}")));
        }

        let tool_name = name.to_string();
        let span = info_span!("mcp.tool.call", tool.name = tool_name.as_str());
        let _guard = span.enter();
        let start = Instant::now();

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let result = self.tools.execute(name, arguments).unwrap_or_else(|e| {
            tracing::warn!(tool = %tool_name, error = %e, "Tool call failed");
            super::ToolResult::error(e.to_string())
        });
        let status_label = if result.is_error { "error" } else { "success" };

        metrics::counter!(
            "mcp_tool_calls_total",
            "tool" => tool_name.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!("mcp_tool_duration_ms", "tool" => tool_name)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error
        }))
    }
}

/// Formats a response.
fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

/// Formats an error response.
fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    /// `None` when absent; an explicit `null` is kept as `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present_id")]
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

fn present_id<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}
