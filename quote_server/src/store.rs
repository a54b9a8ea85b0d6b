//! SQLite quote store.
//!
//! Each `save_rate` call acquires its own pooled connection, ensures the
//! `exchange_rate` table, and writes one row inside a transaction bounded by the
//! store deadline. The deadline bounds BEGIN and INSERT only; once the insert
//! succeeded the commit is awaited to completion, so an `Err` always means no row
//! was written. A BEGIN cut short closes its connection, and an INSERT cut short
//! is rolled back explicitly before the error is returned.

use std::path::Path;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteQueryResult,
};
use sqlx::{Connection, Row, Sqlite, Transaction};
use tokio::time::{Instant, timeout_at};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ExchangeRate, PersistedQuote, RowsAffected};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(1);

/// Sink persisting one `ExchangeRate` per call.
pub trait RateStore: Send + Sync {
    /// Inserts `rate` under a fresh identifier; the transaction is bounded by `deadline`.
    fn save_rate(
        &self,
        rate: &ExchangeRate,
        deadline: Duration,
    ) -> impl Future<Output = Result<RowsAffected, StoreError>> + Send;
}

pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    /// Prepares a lazily connecting pool over the database file at `path`.
    /// The file is created on first use; its directory must exist.
    pub fn open(path: &Path, max_connections: u32) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Self { pool }
    }

    async fn connect(&self) -> Result<PoolConnection<Sqlite>, StoreError> {
        acquire(&self.pool).await
    }

    /// Every stored quote, oldest identifier first.
    pub async fn list_rates(&self) -> Result<Vec<PersistedQuote>, StoreError> {
        let mut conn = self.connect().await?;
        ensure_schema(&mut conn).await?;

        let rows = sqlx::query(
            r#"
            SELECT id, code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date
            FROM exchange_rate
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreError::Read)?;

        rows.iter()
            .map(|row| -> Result<PersistedQuote, StoreError> {
                let id: String = row.try_get("id").map_err(StoreError::Read)?;
                let id = Uuid::parse_str(&id)
                    .map_err(|e| StoreError::Corrupt(format!("id '{}': {}", id, e)))?;
                let text = |column: &str| row.try_get::<String, _>(column).map_err(StoreError::Read);

                Ok(PersistedQuote {
                    id,
                    rate: ExchangeRate {
                        code: text("code")?,
                        code_in: text("codein")?,
                        name: text("name")?,
                        high: text("high")?,
                        low: text("low")?,
                        var_bid: text("varBid")?,
                        pct_change: text("pctChange")?,
                        bid: text("bid")?,
                        ask: text("ask")?,
                        timestamp: text("timestamp")?,
                        create_date: text("create_date")?,
                    },
                })
            })
            .collect()
    }
}

impl RateStore for SqliteQuoteStore {
    async fn save_rate(
        &self,
        rate: &ExchangeRate,
        deadline: Duration,
    ) -> Result<RowsAffected, StoreError> {
        let pool = self.pool.clone();
        let rate = rate.clone();

        // The write runs detached so a caller giving up mid-statement cannot
        // interrupt it between BEGIN and its rollback or commit.
        tokio::spawn(async move { write_rate(pool, rate, deadline).await })
            .await
            .map_err(StoreError::Task)?
    }
}

async fn write_rate(
    pool: SqlitePool,
    rate: ExchangeRate,
    deadline: Duration,
) -> Result<RowsAffected, StoreError> {
    let mut conn = acquire(&pool).await?;
    ensure_schema(&mut conn).await?;

    let expires = Instant::now() + deadline;
    let timed_out = |cause: String| StoreError::Timeout {
        budget: deadline,
        cause,
    };

    let begun = timeout_at(expires, conn.begin()).await;
    let mut tx = match begun {
        Ok(Ok(tx)) => tx,
        Ok(Err(e)) => return Err(timed_out(format!("begin failed: {}", e))),
        Err(_) => {
            drop(begun);
            // BEGIN may still have run; closing the connection discards it.
            let cause = match conn.close().await {
                Ok(()) => "deadline elapsed before begin".to_string(),
                Err(e) => format!("deadline elapsed before begin; close failed: {}", e),
            };
            return Err(timed_out(cause));
        }
    };

    let id = Uuid::now_v7();
    let result = match timeout_at(expires, insert_rate(&mut tx, &id, &rate)).await {
        Ok(Ok(result)) => result,
        Ok(Err(write)) => return Err(rollback(tx, StoreError::Write(write)).await),
        Err(_) => {
            let cause = timed_out("deadline elapsed during insert".into());
            return Err(rollback(tx, cause).await);
        }
    };

    // Unbounded: a COMMIT already handed to SQLite lands even if abandoned.
    tx.commit().await.map_err(StoreError::Commit)?;
    Ok(RowsAffected::new(result.rows_affected()))
}

async fn acquire(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, StoreError> {
    pool.acquire().await.map_err(StoreError::Connect)
}

/// Rolls `tx` back after `cause`; a failed rollback wraps both errors.
async fn rollback(tx: Transaction<'_, Sqlite>, cause: StoreError) -> StoreError {
    match tx.rollback().await {
        Ok(()) => cause,
        Err(rollback) => StoreError::RollbackFailed {
            write: Box::new(cause),
            rollback,
        },
    }
}

/// Creates the `exchange_rate` table when absent; existing data is left untouched.
pub async fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exchange_rate (
            id TEXT PRIMARY KEY,
            code TEXT,
            codein TEXT,
            name TEXT,
            high TEXT,
            low TEXT,
            varBid TEXT,
            pctChange TEXT,
            bid TEXT,
            ask TEXT,
            timestamp TEXT,
            create_date TEXT
        )
        "#,
    )
    .execute(&mut *conn)
    .await
    .map_err(StoreError::Schema)?;

    Ok(())
}

async fn insert_rate(
    tx: &mut Transaction<'_, Sqlite>,
    id: &Uuid,
    rate: &ExchangeRate,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO exchange_rate
        (id, code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&rate.code)
    .bind(&rate.code_in)
    .bind(&rate.name)
    .bind(&rate.high)
    .bind(&rate.low)
    .bind(&rate.var_bid)
    .bind(&rate.pct_change)
    .bind(&rate.bid)
    .bind(&rate.ask)
    .bind(&rate.timestamp)
    .bind(&rate.create_date)
    .execute(&mut **tx)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::exchange_rate::sample_rate;

    const BUDGET: Duration = Duration::from_secs(5);

    fn temp_store() -> (tempfile::TempDir, SqliteQuoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteQuoteStore::open(&dir.path().join("quotations.db"), 2);
        (dir, store)
    }

    #[tokio::test]
    async fn save_inserts_exactly_one_row() {
        let (_dir, store) = temp_store();

        let rows = store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap();

        assert_eq!(rows, RowsAffected::new(1));
        let stored = store.list_rates().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].rate, sample_rate("5.43"));
    }

    #[tokio::test]
    async fn repeated_saves_get_distinct_ids() {
        let (_dir, store) = temp_store();

        store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap();
        store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap();

        let stored = store.list_rates().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].id, stored[1].id);
    }

    #[tokio::test]
    async fn schema_bootstrap_keeps_existing_rows() {
        let (_dir, store) = temp_store();
        store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap();

        let mut conn = store.connect().await.unwrap();
        ensure_schema(&mut conn).await.unwrap();
        drop(conn);

        assert_eq!(store.list_rates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_and_leaves_no_row() {
        let (_dir, store) = temp_store();
        {
            let mut conn = store.connect().await.unwrap();
            sqlx::query(
                "CREATE TABLE exchange_rate (
                    id TEXT PRIMARY KEY, code TEXT, codein TEXT, name TEXT, high TEXT, low TEXT,
                    varBid TEXT, pctChange TEXT, bid TEXT, ask TEXT, timestamp TEXT,
                    create_date TEXT, source TEXT NOT NULL
                )",
            )
            .execute(&mut *conn)
            .await
            .unwrap();
        }

        let err = store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap_err();

        assert!(matches!(err, StoreError::Write(_)), "unexpected error: {err}");
        assert!(store.list_rates().await.unwrap().is_empty());
    }

    async fn row_count(store: &SqliteQuoteStore) -> usize {
        store.list_rates().await.unwrap().len()
    }

    #[tokio::test]
    async fn budget_exhaustion_never_leaves_a_row_behind() {
        let (_dir, store) = temp_store();
        row_count(&store).await;

        for micros in (0..3000).step_by(7) {
            let before = row_count(&store).await;
            let outcome = store
                .save_rate(&sample_rate("5.43"), Duration::from_micros(micros))
                .await;
            let after = row_count(&store).await;

            match outcome {
                Ok(rows) => {
                    assert_eq!(rows, RowsAffected::new(1));
                    assert_eq!(after, before + 1, "budget {micros}µs");
                }
                Err(err) => {
                    assert!(matches!(err, StoreError::Timeout { .. }), "unexpected error: {err}");
                    assert_eq!(after, before, "budget {micros}µs left a row: {err}");
                }
            }
        }
    }

    #[tokio::test]
    async fn zero_budget_fails_clean_or_writes_once() {
        let (_dir, store) = temp_store();
        row_count(&store).await;

        match store.save_rate(&sample_rate("5.43"), Duration::ZERO).await {
            Ok(_) => assert_eq!(row_count(&store).await, 1),
            Err(err) => {
                assert!(err.to_string().contains("could not complete within 0ns"), "{err}");
                assert_eq!(row_count(&store).await, 0);
            }
        }

        // The pool stays usable after a cut-short transaction.
        store.save_rate(&sample_rate("5.44"), BUDGET).await.unwrap();
        let stored = store.list_rates().await.unwrap();
        assert!(stored.iter().any(|quote| quote.rate == sample_rate("5.44")));
    }

    #[tokio::test]
    async fn missing_directory_is_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteQuoteStore::open(&dir.path().join("absent").join("quotations.db"), 1);

        let err = store.save_rate(&sample_rate("5.43"), BUDGET).await.unwrap_err();

        assert!(matches!(err, StoreError::Connect(_)), "unexpected error: {err}");
    }
}
