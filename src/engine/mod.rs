//! Pure computation engine for the advance ledger.
//!
//! The engine folds an ordered event stream into balances: interest accrues
//! daily on outstanding principal, payments settle interest first and then
//! advances oldest first, and any surplus is held as credit against future
//! advances.

use chrono::NaiveDate;
use rust_decimal::Decimal as RustDecimal;
use serde::Serialize;

use crate::domain::{parse_date, Advance, Decimal, Event, EventRecord};
use crate::error::LedgerError;

pub mod ledger;
pub mod offset;

pub use ledger::{LedgerEngine, LedgerState};
pub use offset::subtract_smaller_from_larger;

/// Simple daily interest rate: 0.035% per day.
pub const DEFAULT_INTEREST_RATE: Decimal =
    Decimal::new(RustDecimal::from_parts(35, 0, 0, false, 5));

/// Balances as of a cutoff date, inclusive of that day's interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub as_of: NaiveDate,
    /// Advances in origination order.
    pub advances: Vec<Advance>,
    pub total_outstanding_principal: Decimal,
    pub interest_payable: Decimal,
    pub interest_paid_cumulative: Decimal,
    pub future_payment_credit: Decimal,
}

/// Replay `events` (date ascending) and report balances as of `as_of`.
pub fn compute<I>(events: I, as_of: NaiveDate, interest_rate: Decimal) -> Snapshot
where
    I: IntoIterator<Item = Event>,
{
    LedgerEngine::new(interest_rate).replay(events, as_of)
}

/// Like [`compute`], but over raw text records and a text cutoff date.
///
/// Records are parsed one at a time as they are consumed; the first record
/// that fails to parse aborts the replay.
///
/// # Errors
/// `MalformedDate` for a bad cutoff, otherwise the first record's parse error.
pub fn replay_records<I>(
    records: I,
    as_of: &str,
    interest_rate: Decimal,
) -> Result<Snapshot, LedgerError>
where
    I: IntoIterator<Item = EventRecord>,
{
    let as_of = parse_date(as_of)?;
    let mut engine = LedgerEngine::new(interest_rate);
    for record in records {
        let event = record.parse()?;
        if event.occurred_on > as_of {
            break;
        }
        engine.apply(&event);
    }
    Ok(engine.finish(as_of))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, kind: &str, amount: &str, date: &str) -> EventRecord {
        EventRecord {
            id,
            kind: kind.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_default_rate_value() {
        assert_eq!(DEFAULT_INTEREST_RATE.to_canonical_string(), "0.00035");
    }

    #[test]
    fn test_replay_records_happy_path() {
        let records = vec![
            record(1, "advance", "1000.00", "2023-01-01"),
            record(2, "payment", "3.50", "2023-01-11"),
        ];
        let snapshot = replay_records(records, "2023-01-10", DEFAULT_INTEREST_RATE).unwrap();
        assert_eq!(snapshot.advances.len(), 1);
        assert_eq!(snapshot.interest_payable.to_canonical_string(), "3.5");
        assert!(snapshot.interest_paid_cumulative.is_zero());
    }

    #[test]
    fn test_replay_records_rejects_unknown_kind() {
        let records = vec![
            record(1, "advance", "1000", "2023-01-01"),
            record(2, "chargeback", "10", "2023-01-02"),
        ];
        let err = replay_records(records, "2023-01-10", DEFAULT_INTEREST_RATE).unwrap_err();
        assert_eq!(err, LedgerError::InvalidEventKind("chargeback".to_string()));
    }

    #[test]
    fn test_replay_records_rejects_bad_cutoff() {
        let err = replay_records(Vec::new(), "2023/01/10", DEFAULT_INTEREST_RATE).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedDate(_)));
    }

    #[test]
    fn test_replay_records_rejects_bad_amount() {
        let records = vec![record(1, "advance", "ten", "2023-01-01")];
        let err = replay_records(records, "2023-01-10", DEFAULT_INTEREST_RATE).unwrap_err();
        assert_eq!(err, LedgerError::MalformedAmount("ten".to_string()));
    }
}
