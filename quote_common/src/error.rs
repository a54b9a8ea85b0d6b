//! Error types shared between client and server.
//!
//! The `QuoteError` enum unifies process-level failure cases (I/O, JSON, HTTP
//! transport, deadlines, lock poisoning) so both binaries can propagate a single
//! error type out of `main`.
use std::io;
use std::sync::PoisonError;
use std::time::Duration;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from sockets or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// HTTP transport failure reported by reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within its deadline.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("Server answered {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message taken from the error body, if any.
        message: String,
    },

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
