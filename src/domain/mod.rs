//! Domain types for the advance ledger.
//!
//! This module provides:
//! - Exact decimal arithmetic via the `Decimal` wrapper
//! - Ledger events (`Event`, `EventKind`) and their raw text form
//! - Advance records reported by the engine

pub mod advance;
pub mod decimal;
pub mod event;

pub use advance::Advance;
pub use decimal::Decimal;
pub use event::{
    parse_amount, parse_date, Event, EventId, EventKind, EventRecord, NewEvent,
    DATE_FORMAT,
};
