//! Ledger events: advances drawn and payments received.

use crate::domain::Decimal;
use crate::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used for every date crossing a text boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::MalformedDate(s.to_string()))
}

/// Largest accepted event amount, in currency units.
///
/// Keeps a full replay, including decades of accrued interest, inside the
/// 28-digit range of the underlying decimal.
pub const MAX_AMOUNT: Decimal = Decimal::new(RustDecimal::from_parts(
    0xA4C6_8000, // 10^15, low word
    0x38D7E,     // 10^15, mid word
    0,
    false,
    0,
));

/// Parse an exact decimal amount no larger in magnitude than [`MAX_AMOUNT`].
pub fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    let amount = Decimal::from_str_canonical(s)
        .map_err(|_| LedgerError::MalformedAmount(s.to_string()))?;
    if amount.inner().abs() > MAX_AMOUNT.inner() {
        return Err(LedgerError::MalformedAmount(s.to_string()));
    }
    Ok(amount)
}

/// Opaque identifier of a stored event (the store's row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl EventId {
    pub fn new(id: i64) -> Self {
        EventId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Cash drawn by the customer.
    Advance,
    /// Cash repaid by the customer.
    Payment,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Advance => "advance",
            EventKind::Payment => "payment",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "advance" => Ok(EventKind::Advance),
            "payment" => Ok(EventKind::Payment),
            other => Err(LedgerError::InvalidEventKind(other.to_string())),
        }
    }
}

/// An immutable fact in the ledger history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub sequence_id: EventId,
    pub kind: EventKind,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
}

impl Event {
    pub fn new(sequence_id: EventId, kind: EventKind, amount: Decimal, occurred_on: NaiveDate) -> Self {
        Self {
            sequence_id,
            kind,
            amount,
            occurred_on,
        }
    }

    pub fn advance(sequence_id: i64, amount: Decimal, occurred_on: NaiveDate) -> Self {
        Self::new(EventId::new(sequence_id), EventKind::Advance, amount, occurred_on)
    }

    pub fn payment(sequence_id: i64, amount: Decimal, occurred_on: NaiveDate) -> Self {
        Self::new(EventId::new(sequence_id), EventKind::Payment, amount, occurred_on)
    }
}

/// An event that has not been stored yet, so has no sequence id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub kind: EventKind,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
}

impl NewEvent {
    pub fn new(kind: EventKind, amount: Decimal, occurred_on: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            occurred_on,
        }
    }
}

/// An event as it sits in storage or a file: every field still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: i64,
    pub kind: String,
    pub amount: String,
    pub date: String,
}

impl EventRecord {
    /// Convert into a typed [`Event`].
    ///
    /// # Errors
    /// `InvalidEventKind`, `MalformedAmount` or `MalformedDate`, checked in that order.
    pub fn parse(&self) -> Result<Event, LedgerError> {
        let kind = self.kind.parse::<EventKind>()?;
        let amount = parse_amount(&self.amount)?;
        let occurred_on = parse_date(&self.date)?;
        Ok(Event::new(EventId::new(self.id), kind, amount, occurred_on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, amount: &str, date: &str) -> EventRecord {
        EventRecord {
            id: 7,
            kind: kind.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_kind_roundtrips_through_text() {
        assert_eq!("advance".parse::<EventKind>().unwrap(), EventKind::Advance);
        assert_eq!("payment".parse::<EventKind>().unwrap(), EventKind::Payment);
        assert_eq!(EventKind::Advance.to_string(), "advance");
        assert_eq!(EventKind::Payment.to_string(), "payment");
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        match "Advance".parse::<EventKind>() {
            Err(LedgerError::InvalidEventKind(k)) => assert_eq!(k, "Advance"),
            other => panic!("expected InvalidEventKind, got {:?}", other),
        }
    }

    #[test]
    fn test_record_parse_ok() {
        let event = record("advance", "500.00", "2021-05-17").parse().unwrap();
        assert_eq!(event.sequence_id, EventId::new(7));
        assert_eq!(event.kind, EventKind::Advance);
        assert_eq!(event.amount, Decimal::from_str_canonical("500").unwrap());
        assert_eq!(event.occurred_on, NaiveDate::from_ymd_opt(2021, 5, 17).unwrap());
    }

    #[test]
    fn test_record_parse_invalid_kind() {
        let err = record("refund", "1", "2021-05-17").parse().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEventKind(ref k) if k == "refund"));
    }

    #[test]
    fn test_record_parse_malformed_amount() {
        let err = record("payment", "1.2.3", "2021-05-17").parse().unwrap_err();
        assert!(matches!(err, LedgerError::MalformedAmount(_)));
    }

    #[test]
    fn test_record_parse_malformed_date() {
        let err = record("payment", "1", "17/05/2021").parse().unwrap_err();
        assert!(matches!(err, LedgerError::MalformedDate(_)));

        let err = record("payment", "1", "2021-02-30").parse().unwrap_err();
        assert!(matches!(err, LedgerError::MalformedDate(_)));
    }

    #[test]
    fn test_amount_bounded() {
        assert_eq!(MAX_AMOUNT.to_canonical_string(), "1000000000000000");
        assert!(parse_amount("1000000000000000").is_ok());
        assert!(parse_amount("-1000000000000000").is_ok());

        let err = parse_amount("50000000000000000000000000000").unwrap_err();
        assert_eq!(
            err,
            LedgerError::MalformedAmount("50000000000000000000000000000".to_string())
        );
        assert!(matches!(
            parse_amount("1000000000000000.01"),
            Err(LedgerError::MalformedAmount(_))
        ));
    }

    #[test]
    fn test_event_serializes_kind_lowercase() {
        let event = Event::payment(1, Decimal::from(5), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "payment");
        assert_eq!(json["occurred_on"], "2023-01-01");
        assert_eq!(json["amount"], "5");
    }
}
