//! Point-in-time currency quote as published by the upstream API.
//!
//! Every field is kept as the upstream string so values round-trip without
//! reformatting. Deserialization fails when any field is absent; there is no
//! partially populated `ExchangeRate`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One quote for a currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Base currency code, e.g. `USD`.
    pub code: String,
    /// Quote currency code, e.g. `BRL`.
    #[serde(rename = "codein")]
    pub code_in: String,
    /// Human readable pair name.
    pub name: String,
    pub high: String,
    pub low: String,
    pub var_bid: String,
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    /// Upstream epoch seconds, as text.
    pub timestamp: String,
    #[serde(rename = "create_date")]
    pub create_date: String,
}

/// A stored `ExchangeRate` together with its generated primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedQuote {
    pub id: Uuid,
    pub rate: ExchangeRate,
}

#[cfg(test)]
pub(crate) fn sample_rate(bid: &str) -> ExchangeRate {
    ExchangeRate {
        code: "USD".into(),
        code_in: "BRL".into(),
        name: "Dólar Americano/Real Brasileiro".into(),
        high: "5.4612".into(),
        low: "5.4105".into(),
        var_bid: "0.0123".into(),
        pct_change: "0.23".into(),
        bid: bid.into(),
        ask: "5.4315".into(),
        timestamp: "1729339200".into(),
        create_date: "2024-10-19 09:00:00".into(),
    }
}
