//! Repository layer for the event store.

use crate::domain::{EventRecord, NewEvent, DATE_FORMAT};
use chrono::NaiveDate;
use futures::stream::{BoxStream, StreamExt};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

const INSERT_EVENT: &str = r#"
    INSERT INTO events (type, amount, date_created)
    VALUES (?, ?, ?)
"#;

// Same-day events keep insertion order through the id tie-break.
const SELECT_EVENTS_UNTIL: &str = r#"
    SELECT id, type, amount, date_created
    FROM events
    WHERE date(date_created) <= date(?)
    ORDER BY date_created ASC, id ASC
"#;

/// Repository for event store operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append events in a single transaction, in slice order.
    ///
    /// Either every event is stored or none is.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_events_batch(&self, events: &[NewEvent]) -> Result<usize, sqlx::Error> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for event in events {
            sqlx::query(INSERT_EVENT)
                .bind(event.kind.as_str())
                .bind(event.amount.to_canonical_string())
                .bind(event.occurred_on.format(DATE_FORMAT).to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(events.len())
    }

    pub async fn count_events(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }

    /// Stream stored events dated on or before `as_of`, in replay order.
    ///
    /// Rows are fetched lazily; nothing is buffered beyond the current row.
    pub fn stream_events_until(
        &self,
        as_of: NaiveDate,
    ) -> BoxStream<'_, Result<EventRecord, sqlx::Error>> {
        sqlx::query(SELECT_EVENTS_UNTIL)
            .bind(as_of.format(DATE_FORMAT).to_string())
            .fetch(&self.pool)
            .map(|row| row.and_then(|row| record_from_row(&row)))
            .boxed()
    }

    /// Collect stored events dated on or before `as_of`, in replay order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_events_until(&self, as_of: NaiveDate) -> Result<Vec<EventRecord>, sqlx::Error> {
        let rows = sqlx::query(SELECT_EVENTS_UNTIL)
            .bind(as_of.format(DATE_FORMAT).to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<EventRecord, sqlx::Error> {
    Ok(EventRecord {
        id: row.try_get("id")?,
        kind: row.try_get("type")?,
        amount: row.try_get("amount")?,
        date: row.try_get("date_created")?,
    })
}
