use crate::db::Repository;
use crate::domain::{Decimal, Event};
use crate::engine::{LedgerEngine, Snapshot};
use crate::error::LedgerError;
use chrono::NaiveDate;
use futures::TryStreamExt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Rebuilds balances from the full stored history on every request.
#[derive(Clone)]
pub struct BalanceService {
    repo: Arc<Repository>,
    interest_rate: Decimal,
}

impl BalanceService {
    pub fn new(repo: Arc<Repository>, interest_rate: Decimal) -> Self {
        Self {
            repo,
            interest_rate,
        }
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    /// Replay every stored event up to `as_of` through a fresh engine.
    ///
    /// Rows are folded into the engine as they arrive from SQLite.
    pub async fn balances_as_of(&self, as_of: NaiveDate) -> Result<Snapshot, ReplayError> {
        let mut engine = LedgerEngine::new(self.interest_rate);
        let mut records = self.repo.stream_events_until(as_of);
        let mut applied = 0usize;

        while let Some(record) = records.try_next().await? {
            let event = record.parse()?;
            engine.apply(&event);
            applied += 1;
        }

        let snapshot = engine.finish(as_of);
        info!(
            as_of = %as_of,
            events = applied,
            advances = snapshot.advances.len(),
            "replayed ledger"
        );
        Ok(snapshot)
    }

    /// Stored events up to `as_of`, in replay order.
    pub async fn events_until(&self, as_of: NaiveDate) -> Result<Vec<Event>, ReplayError> {
        let records = self.repo.list_events_until(as_of).await?;
        records
            .iter()
            .map(|record| record.parse().map_err(ReplayError::from))
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("stored event is unreadable: {0}")]
    Ledger(#[from] LedgerError),
}
