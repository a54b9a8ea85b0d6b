//!
//! Common types and utilities shared by the quotation server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used by both binaries.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `response` — JSON bodies exchanged over `GET /cotacao`.
//! - `net` — port and route constants.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod response;
pub mod result;

pub use error::QuoteError;
pub use response::{BidResponse, ErrorResponse};
pub use result::Result;
