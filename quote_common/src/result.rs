//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `QuoteError`, so process-level functions can
//! simply return `Result<T>`.
use crate::error::QuoteError;

/// Workspace-wide `Result` alias with `QuoteError` as the default error.
pub type Result<T, E = QuoteError> = std::result::Result<T, E>;
