//! MCP server implementation.
//!
//! Exposes the statistics operations as Model Context Protocol tools over
//! stdio.
//!
//! ## Tools
//!
//! `deck_stats`, `collection_stats`, `review_history`, `list_decks`,
//! `anki_status`.
//!
//! ## Claude Desktop Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "anki": {
//!       "command": "ankistat",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```

mod dispatch;
mod server;
pub mod tool_types;
mod tools;

pub use dispatch::McpMethod;
pub use server::{McpServer, PROTOCOL_VERSION};
pub use tools::{ToolContent, ToolDefinition, ToolRegistry, ToolResult};
