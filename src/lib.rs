//! # Ankistat
//!
//! An MCP server that exposes Anki collection statistics through AnkiConnect.
//!
//! Ankistat turns the raw scheduling data Anki keeps per card (ease factors,
//! intervals, review logs) into aggregate metrics an assistant can reason about.
//!
//! ## Features
//!
//! - Ease and interval distributions with configurable histogram buckets
//! - Retention ratios broken down by answer button
//! - Study streak detection over a review-history window
//! - Per-deck and collection-wide views
//! - MCP server over stdio for AI agent interoperability
//!
//! ## Example
//!
//! ```rust,ignore
//! use ankistat::anki::AnkiConnectClient;
//! use ankistat::services::{StatsService, DeckStatsRequest};
//!
//! let service = StatsService::new(AnkiConnectClient::new());
//! let stats = service.deck_stats(&DeckStatsRequest::new("Japanese::Vocab"))?;
//! println!("{} cards, mean ease {:.2}", stats.counts.total, stats.ease.mean);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod anki;
pub mod config;
pub mod mcp;
pub mod observability;
pub mod services;
pub mod stats;

// Re-exports for convenience
pub use anki::{AnkiBackend, AnkiConnectClient};
pub use config::AnkiStatConfig;
pub use services::StatsService;
pub use stats::{Boundaries, DistributionResult, Rating, RetentionResult};

/// Error type for ankistat operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad dates, non-ascending buckets, unknown rating codes, malformed tool arguments |
/// | `NotFound` | A requested deck is absent from the AnkiConnect counts response |
/// | `UpstreamUnavailable` | AnkiConnect cannot be reached or the HTTP exchange fails |
/// | `Upstream` | AnkiConnect answered with a non-null `error` field |
/// | `MalformedResponse` | An AnkiConnect result has a shape we cannot use |
/// | `OperationFailed` | Local I/O: config files, log files, stdio, metrics install |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided by the caller.
    ///
    /// Always raised before any AnkiConnect request is issued.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A named entity does not exist upstream.
    #[error("{kind} not found: {identifier}")]
    NotFound {
        /// Kind of entity (e.g. "deck").
        kind: &'static str,
        /// The identifier that was looked up.
        identifier: String,
    },

    /// AnkiConnect could not be reached.
    #[error(
        "AnkiConnect unavailable during '{operation}': {cause} (is Anki running with the AnkiConnect add-on enabled?)"
    )]
    UpstreamUnavailable {
        /// The AnkiConnect action being attempted.
        operation: String,
        /// The underlying transport failure.
        cause: String,
    },

    /// AnkiConnect reported an error for an action.
    #[error("AnkiConnect action '{action}' failed: {message}")]
    Upstream {
        /// The AnkiConnect action.
        action: String,
        /// The error message returned by AnkiConnect, verbatim.
        message: String,
    },

    /// An AnkiConnect response did not have the expected shape.
    #[error("malformed response for '{operation}': {cause}")]
    MalformedResponse {
        /// The operation whose response was malformed.
        operation: String,
        /// What was wrong with it.
        cause: String,
    },

    /// A local operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for ankistat operations.
pub type Result<T> = std::result::Result<T, Error>;
