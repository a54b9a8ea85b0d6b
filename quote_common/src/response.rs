//! JSON bodies returned by the quotation server.
//!
//! Success carries the bid only. Failures collapse to an `ErrorResponse` with one of
//! the generic messages below; internal causes are never written to the wire.
use serde::{Deserialize, Serialize};

/// Body for `408` responses.
pub const REQUEST_TIMEOUT: &str = "Request timeout";
/// Body for `500` responses when the upstream quote could not be obtained.
pub const FETCH_FAILED: &str = "Error getting exchange-rate";
/// Body for `500` responses when the quote could not be persisted.
pub const PERSIST_FAILED: &str = "Error saving exchange-rate";
/// Body for `500` responses from the health route.
pub const HEALTH_FAILED: &str = "Error collecting health metrics";

/// Successful `GET /cotacao` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    /// Bid exactly as published upstream.
    pub bid: String,
}

impl BidResponse {
    /// Wraps a bid string.
    pub fn new(bid: impl Into<String>) -> Self {
        Self { bid: bid.into() }
    }
}

/// Generic error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Caller-facing message.
    pub error: String,
}

impl ErrorResponse {
    /// Wraps a caller-facing message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
