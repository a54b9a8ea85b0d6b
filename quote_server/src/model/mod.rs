//! Domain models for the quotation server.
//!
//! - `exchange_rate`: the upstream quote record and its persisted form.
//! - `rows_affected`: insert result used for request logging.
//! - `health`: process health report served by `/health`.

pub mod exchange_rate;
pub mod health;
pub mod rows_affected;

pub use exchange_rate::{ExchangeRate, PersistedQuote};
pub use health::{CpuStats, HealthReport, MemoryStats};
pub use rows_affected::RowsAffected;
