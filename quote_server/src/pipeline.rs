//! Deadline-bounded fetch-persist pipeline behind `GET /cotacao`.
//!
//! One run moves through `Pending -> Fetching -> Persisting -> Succeeded`, leaving
//! early to `TimedOut`, `UpstreamFailed` or `PersistFailed`:
//!
//! - The inbound deadline is compared with the clock on entry and again before the
//!   store is touched; an elapsed deadline means `TimedOut` with no further calls.
//! - Fetch and store each get their own budget. The budgets are siblings: the store
//!   budget is never reduced by a slow fetch.
//! - Both sub-calls are also raced against the inbound deadline. When it fires, the
//!   sub-call future is dropped, which aborts the HTTP request or rolls back the
//!   open transaction.
//! - Nothing is retried.

use std::time::Duration;

use log::debug;
use strum::Display;
use tokio::time::{Instant, timeout_at};

use crate::error::{FetchError, StoreError};
use crate::fetcher::RateSource;
use crate::model::RowsAffected;
use crate::store::RateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineState {
    Pending,
    Fetching,
    Persisting,
    Succeeded,
    TimedOut,
    UpstreamFailed,
    PersistFailed,
}

/// Terminal result of one pipeline run.
#[derive(Debug)]
pub enum QuotationOutcome {
    /// The quote was stored; only `bid` reaches the caller.
    Succeeded { bid: String, rows: RowsAffected },
    /// The deadline ran out while in `stage`.
    TimedOut { stage: PipelineState },
    UpstreamFailed(FetchError),
    PersistFailed(StoreError),
}

impl QuotationOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            QuotationOutcome::Succeeded { .. } => PipelineState::Succeeded,
            QuotationOutcome::TimedOut { .. } => PipelineState::TimedOut,
            QuotationOutcome::UpstreamFailed(_) => PipelineState::UpstreamFailed,
            QuotationOutcome::PersistFailed(_) => PipelineState::PersistFailed,
        }
    }
}

pub struct QuotationPipeline<F, S> {
    fetcher: F,
    store: S,
    fetch_budget: Duration,
    store_budget: Duration,
}

impl<F: RateSource, S: RateStore> QuotationPipeline<F, S> {
    pub fn new(fetcher: F, store: S, fetch_budget: Duration, store_budget: Duration) -> Self {
        Self {
            fetcher,
            store,
            fetch_budget,
            store_budget,
        }
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Runs fetch then persist, finishing no later than `deadline`.
    ///
    /// A deadline already spent on entry yields `TimedOut` without touching the
    /// fetcher or the store. The routes hand in a fresh deadline per request, so
    /// from HTTP this only fires with a zero request budget.
    pub async fn run(&self, deadline: Instant) -> QuotationOutcome {
        let mut state = PipelineState::Pending;
        if remaining(deadline).is_none() {
            return QuotationOutcome::TimedOut { stage: state };
        }

        state = transition(state, PipelineState::Fetching);
        let rate = match timeout_at(deadline, self.fetcher.fetch_rate(self.fetch_budget)).await {
            Ok(Ok(rate)) => rate,
            Ok(Err(FetchError::Timeout(_))) | Err(_) => {
                return QuotationOutcome::TimedOut { stage: state };
            }
            Ok(Err(e)) => return QuotationOutcome::UpstreamFailed(e),
        };

        if remaining(deadline).is_none() {
            return QuotationOutcome::TimedOut { stage: state };
        }

        state = transition(state, PipelineState::Persisting);
        let saved = timeout_at(deadline, self.store.save_rate(&rate, self.store_budget)).await;
        match saved {
            Ok(Ok(rows)) => {
                transition(state, PipelineState::Succeeded);
                QuotationOutcome::Succeeded {
                    bid: rate.bid,
                    rows,
                }
            }
            Ok(Err(e)) => QuotationOutcome::PersistFailed(e),
            Err(_) => QuotationOutcome::TimedOut { stage: state },
        }
    }
}

/// Budget left before `deadline`, or `None` once it has passed.
pub fn remaining(deadline: Instant) -> Option<Duration> {
    deadline
        .checked_duration_since(Instant::now())
        .filter(|left| !left.is_zero())
}

fn transition(from: PipelineState, to: PipelineState) -> PipelineState {
    debug!("quotation pipeline {} -> {}", from, to);
    to
}
