//! CSV ingestion into the event store.

use crate::db::Repository;
use crate::domain::{parse_amount, parse_date, EventKind, NewEvent};
use crate::error::LedgerError;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Columns per row: `type,date,amount`.
const FIELDS_PER_ROW: usize = 3;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected 3 fields (type,date,amount), found {found}")]
    FieldCount { line: u64, found: usize },
    #[error("line {line}: {source}")]
    Invalid {
        line: u64,
        #[source]
        source: LedgerError,
    },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionResult {
    pub events_loaded: usize,
}

/// Parse headerless `type,date,amount` rows.
///
/// Fails on the first invalid row; amounts must be non-negative and no larger
/// than [`MAX_AMOUNT`](crate::domain::event::MAX_AMOUNT).
pub fn parse_events<R: Read>(reader: R) -> Result<Vec<NewEvent>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != FIELDS_PER_ROW {
            return Err(IngestError::FieldCount {
                line,
                found: record.len(),
            });
        }

        let event = parse_row(&record[0], &record[1], &record[2])
            .map_err(|source| IngestError::Invalid { line, source })?;
        events.push(event);
    }

    Ok(events)
}

fn parse_row(kind: &str, date: &str, amount: &str) -> Result<NewEvent, LedgerError> {
    let kind = kind.parse::<EventKind>()?;
    let occurred_on = parse_date(date)?;
    let amount_value = parse_amount(amount)?;
    if amount_value.is_negative() {
        return Err(LedgerError::MalformedAmount(amount.to_string()));
    }
    Ok(NewEvent::new(kind, amount_value, occurred_on))
}

/// Loads CSV event files into the store.
#[derive(Clone)]
pub struct Ingestor {
    repo: Arc<Repository>,
}

impl Ingestor {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Parse the whole input, then store it in one transaction.
    pub async fn load_reader<R: Read>(&self, reader: R) -> Result<IngestionResult, IngestError> {
        let events = parse_events(reader)?;
        let events_loaded = self.repo.insert_events_batch(&events).await?;
        Ok(IngestionResult { events_loaded })
    }

    pub async fn load_file(&self, path: &Path) -> Result<IngestionResult, IngestError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let result = self.load_reader(bytes.as_slice()).await?;
        info!(
            path = %path.display(),
            events = result.events_loaded,
            "loaded events"
        );
        Ok(result)
    }
}
