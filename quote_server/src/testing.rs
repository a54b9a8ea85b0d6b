//! Scripted collaborators for pipeline and route tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use quote_common::Result;

use crate::error::{FetchError, StoreError};
use crate::fetcher::RateSource;
use crate::model::{CpuStats, ExchangeRate, MemoryStats, RowsAffected};
use crate::store::RateStore;
use crate::telemetry::MetricsProvider;

/// `RateSource` that counts calls and answers from a script after an optional delay.
pub struct FakeSource {
    respond: fn() -> std::result::Result<ExchangeRate, FetchError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(respond: fn() -> std::result::Result<ExchangeRate, FetchError>) -> Self {
        Self {
            respond,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RateSource for FakeSource {
    async fn fetch_rate(&self, _deadline: Duration) -> std::result::Result<ExchangeRate, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        (self.respond)()
    }
}

/// `RateStore` that counts calls and answers from a script after an optional delay.
pub struct FakeStore {
    respond: fn() -> std::result::Result<RowsAffected, StoreError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeStore {
    pub fn new(respond: fn() -> std::result::Result<RowsAffected, StoreError>) -> Self {
        Self {
            respond,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RateStore for FakeStore {
    async fn save_rate(
        &self,
        _rate: &ExchangeRate,
        _deadline: Duration,
    ) -> std::result::Result<RowsAffected, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        (self.respond)()
    }
}

/// Fixed two-core machine with 1 GiB of memory, a quarter of it used.
pub struct FakeMetrics;

impl MetricsProvider for FakeMetrics {
    fn cpu_stats(&self) -> Result<CpuStats> {
        Ok(CpuStats {
            cores: 2,
            percent_used: vec![12.5, 40.0],
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats> {
        let gib = 1 << 30;
        Ok(MemoryStats::from_bytes(gib, gib / 2, gib / 4, gib / 2))
    }
}
