//! Upstream quote fetcher.
//!
//! Issues one GET against the quote endpoint under a caller-supplied deadline and
//! extracts the record namespaced under the pair key (`{"USDBRL": {...}}`).
//! No caching, no retry, no logging.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::model::ExchangeRate;

/// Default quote endpoint.
pub const UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";
/// Key under which the upstream namespaces the USD/BRL quote.
pub const PAIR_KEY: &str = "USDBRL";

/// Source of a single fresh `ExchangeRate`.
pub trait RateSource: Send + Sync {
    /// Fetches one quote; the whole call, body included, is bounded by `deadline`.
    fn fetch_rate(
        &self,
        deadline: Duration,
    ) -> impl Future<Output = Result<ExchangeRate, FetchError>> + Send;
}

/// `RateSource` backed by an HTTP endpoint.
pub struct HttpRateFetcher {
    client: Client,
    url: String,
    pair_key: String,
}

impl HttpRateFetcher {
    pub fn new(url: impl Into<String>, pair_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
            pair_key: pair_key.into(),
        })
    }

    async fn request(&self, deadline: Duration) -> Result<Vec<u8>, FetchError> {
        let res = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(deadline)
                } else {
                    FetchError::Transport(e)
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let body = res.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(deadline)
            } else {
                FetchError::Decode(format!("unreadable body: {}", e))
            }
        })?;
        Ok(body.to_vec())
    }
}

impl RateSource for HttpRateFetcher {
    async fn fetch_rate(&self, deadline: Duration) -> Result<ExchangeRate, FetchError> {
        // Dropping the request future on expiry aborts the connection.
        let body = tokio::time::timeout(deadline, self.request(deadline))
            .await
            .map_err(|_| FetchError::Timeout(deadline))??;
        decode_rate(&body, &self.pair_key)
    }
}

/// Decodes the upstream mapping and returns the record stored under `pair_key`.
pub fn decode_rate(body: &[u8], pair_key: &str) -> Result<ExchangeRate, FetchError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::Decode(format!("invalid JSON: {}", e)))?;

    let record = payload
        .get(pair_key)
        .ok_or_else(|| FetchError::Decode(format!("missing '{}' in response", pair_key)))?;

    ExchangeRate::deserialize(record)
        .map_err(|e| FetchError::Decode(format!("malformed '{}' record: {}", pair_key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"USDBRL":{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.4612","low":"5.4105","varBid":"0.0123","pctChange":"0.23","bid":"5.43","ask":"5.4315","timestamp":"1729339200","create_date":"2024-10-19 09:00:00"}}"#;

    #[test]
    fn extracts_nested_pair_record() {
        let rate = decode_rate(BODY.as_bytes(), PAIR_KEY).unwrap();
        assert_eq!(rate.bid, "5.43");
        assert_eq!(rate.code_in, "BRL");
    }

    #[test]
    fn absent_pair_key_is_decode_error() {
        let err = decode_rate(BODY.as_bytes(), "EURBRL").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = decode_rate(b"<html>oops</html>", PAIR_KEY).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn partial_record_is_decode_error() {
        let body = r#"{"USDBRL":{"code":"USD","bid":"5.43"}}"#;
        let err = decode_rate(body.as_bytes(), PAIR_KEY).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn non_object_payload_is_decode_error() {
        let err = decode_rate(b"[1,2,3]", PAIR_KEY).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
