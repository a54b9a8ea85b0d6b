//! Sending the quotation request to the server.
//!
//! One GET, bounded by the caller's deadline from send to the last body byte.
//! No retry: a failure is reported and the caller decides whether to run again.
use std::time::Duration;

use log::info;
use quote_common::{BidResponse, ErrorResponse, QuoteError, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;

/// Decoded bid together with the raw response bytes.
#[derive(Debug)]
pub struct Quotation {
    pub bid: BidResponse,
    pub raw: Vec<u8>,
}

/// Helper type for requesting the bid from the server.
pub struct QuotationRequester {
    client: Client,
    url: String,
    timeout: Duration,
}

impl QuotationRequester {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            url: url.to_string(),
            timeout,
        })
    }

    /// Sends the GET and decodes the body. Elapsed deadline maps to
    /// `QuoteError::Timeout`, non-2xx to `QuoteError::Status`.
    pub async fn request_bid(&self) -> Result<Quotation> {
        info!("Sending request :: GET - {}", self.url);
        tokio::time::timeout(self.timeout, self.send())
            .await
            .map_err(|_| QuoteError::Timeout(self.timeout))?
    }

    async fn send(&self) -> Result<Quotation> {
        let res = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = res.status();
        let raw = res.bytes().await?.to_vec();

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&raw)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&raw).into_owned());
            return Err(QuoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bid = serde_json::from_slice::<BidResponse>(&raw)?;
        Ok(Quotation { bid, raw })
    }
}
