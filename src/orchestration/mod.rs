//! Glue between the event store and the ledger engine.

pub mod balances;
pub mod ingest;

pub use balances::{BalanceService, ReplayError};
pub use ingest::{IngestError, IngestionResult, Ingestor};
