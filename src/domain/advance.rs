//! Advance records produced by replaying the ledger.

use crate::domain::{Decimal, EventId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A loan drawn on a specific date.
///
/// Advances are never removed: a fully repaid advance stays in the report with
/// a zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// Sequence id of the originating advance event.
    pub identifier: EventId,
    pub origination_date: NaiveDate,
    /// Amount drawn, before any offset against future-payment credit.
    pub initial_amount: Decimal,
    /// Principal still owed on this advance.
    pub outstanding_balance: Decimal,
}

impl Advance {
    pub fn new(
        identifier: EventId,
        origination_date: NaiveDate,
        initial_amount: Decimal,
        outstanding_balance: Decimal,
    ) -> Self {
        Self {
            identifier,
            origination_date,
            initial_amount,
            outstanding_balance,
        }
    }

    pub fn is_open(&self) -> bool {
        self.outstanding_balance.is_positive()
    }
}
