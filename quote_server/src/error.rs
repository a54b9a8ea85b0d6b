//! Failure taxonomy of the fetch and persist stages.
//!
//! These errors stay inside the server: they are logged with request context and
//! then collapsed to a generic caller-facing body by the routes.
use std::time::Duration;

use thiserror::Error;

/// Failure of the upstream quote fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No response arrived within the fetch deadline.
    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or other transport level failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream answered with status {0}")]
    UpstreamStatus(u16),

    /// Body unreadable, not JSON, or missing the expected pair record.
    #[error("could not decode upstream payload: {0}")]
    Decode(String),
}

/// Failure of the transactional quote insert.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not open store connection: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("could not ensure exchange_rate table: {0}")]
    Schema(#[source] sqlx::Error),

    /// Store budget ran out, or the transaction could not begin.
    #[error("store transaction could not complete within {budget:?}: {cause}")]
    Timeout { budget: Duration, cause: String },

    /// Insert failed and the transaction was rolled back.
    #[error("insert failed and was rolled back: {0}")]
    Write(#[source] sqlx::Error),

    /// Insert failed and the rollback failed too; transaction state is unknown.
    /// `write` is the failure that triggered the rollback.
    #[error("{write}; rollback failed: {rollback}")]
    RollbackFailed {
        write: Box<StoreError>,
        #[source]
        rollback: sqlx::Error,
    },

    #[error("commit failed: {0}")]
    Commit(#[source] sqlx::Error),

    /// The detached write task panicked or was cancelled.
    #[error("store task did not finish: {0}")]
    Task(#[source] tokio::task::JoinError),

    #[error("could not read stored quotes: {0}")]
    Read(#[source] sqlx::Error),

    #[error("stored quote is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Failures that leave the store in an unknown state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::RollbackFailed { .. })
    }
}
