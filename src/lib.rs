pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod report;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Advance, Decimal, Event, EventId, EventKind, EventRecord, NewEvent};
pub use engine::{compute, replay_records, LedgerEngine, LedgerState, Snapshot, DEFAULT_INTEREST_RATE};
pub use error::{AppError, LedgerError};
pub use report::render_balances;
