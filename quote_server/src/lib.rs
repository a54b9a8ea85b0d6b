//! Quotation server.
//!
//! Serves the latest USD/BRL bid over HTTP. Every `GET /cotacao` runs a single-shot
//! pipeline: fetch one quote from the upstream API, store it in SQLite, answer with
//! the bid. Each stage is bounded by its own deadline and the whole request by the
//! request budget. The building blocks:
//!
//! - `fetcher` — `HttpRateFetcher`, the upstream `RateSource`.
//! - `store` — `SqliteQuoteStore`, the transactional `RateStore`.
//! - `pipeline` — `QuotationPipeline`, sequencing both under the inbound deadline and
//!   mapping every failure to a `QuotationOutcome`.
//! - `routes` — actix-web handlers turning outcomes into `200`, `408` or `500`.
//! - `telemetry` — CPU and memory figures for `GET /health`.
//! - `config` — `ServerConfig`, parsed from flags and environment.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod routes;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FetchError, StoreError};
pub use fetcher::{HttpRateFetcher, RateSource};
pub use pipeline::{PipelineState, QuotationOutcome, QuotationPipeline};
pub use routes::{AppState, configure};
pub use store::{RateStore, SqliteQuoteStore};
