use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::domain::{Advance, Decimal, Event, EventKind};

use super::offset::subtract_smaller_from_larger;
use super::{Snapshot, DEFAULT_INTEREST_RATE};

/// Running totals for one replay of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerState {
    /// Sum of every advance's outstanding balance.
    pub total_outstanding_principal: Decimal,
    /// Interest accrued and not yet paid.
    pub interest_payable: Decimal,
    /// Interest paid so far; never decreases.
    pub interest_paid_cumulative: Decimal,
    /// Surplus payments waiting to offset the next advance.
    pub future_payment_credit: Decimal,
    /// Date interest has been accrued up to (None before the first event).
    pub last_accrual_date: Option<NaiveDate>,
    /// Advances in origination order, which is also repayment order.
    pub advances: Vec<Advance>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sum_of_advance_balances(&self) -> Decimal {
        self.advances.iter().map(|a| a.outstanding_balance).sum()
    }

    pub fn open_advances(&self) -> impl Iterator<Item = &Advance> {
        self.advances.iter().filter(|a| a.is_open())
    }
}

/// Replays advance and payment events into balances.
///
/// Events must be fed in non-decreasing date order; same-day events are
/// applied in the order given. Out-of-order input is not detected.
pub struct LedgerEngine {
    interest_rate: Decimal,
    state: LedgerState,
}

impl LedgerEngine {
    /// Create an engine charging `interest_rate` per day on outstanding principal.
    pub fn new(interest_rate: Decimal) -> Self {
        Self {
            interest_rate,
            state: LedgerState::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Apply one event: accrue interest up to its date, then book its effect.
    pub fn apply(&mut self, event: &Event) {
        self.accrue_interest(event.occurred_on);

        match event.kind {
            EventKind::Advance => self.draw_advance(event),
            EventKind::Payment => self.receive_payment(event.amount),
        }

        debug!(
            sequence_id = %event.sequence_id,
            kind = %event.kind,
            amount = %event.amount,
            date = %event.occurred_on,
            principal = %self.state.total_outstanding_principal,
            interest_payable = %self.state.interest_payable,
            credit = %self.state.future_payment_credit,
            "applied ledger event"
        );
    }

    /// Accrue simple interest on the current principal up to `interest_date`.
    ///
    /// The first call only sets the starting date.
    pub fn accrue_interest(&mut self, interest_date: NaiveDate) {
        let Some(last) = self.state.last_accrual_date else {
            self.state.last_accrual_date = Some(interest_date);
            return;
        };

        let days = (interest_date - last).num_days();
        let accrued =
            self.state.total_outstanding_principal * self.interest_rate * Decimal::from(days);
        self.state.interest_payable += accrued;
        self.state.last_accrual_date = Some(interest_date);

        trace!(from = %last, to = %interest_date, days, accrued = %accrued, "accrued interest");
    }

    fn draw_advance(&mut self, event: &Event) {
        let mut drawn = event.amount;
        if self.state.future_payment_credit.is_positive() {
            let (left_to_draw, credit_left) =
                subtract_smaller_from_larger(drawn, self.state.future_payment_credit);
            drawn = left_to_draw;
            self.state.future_payment_credit = credit_left;
        }

        self.state.advances.push(Advance::new(
            event.sequence_id,
            event.occurred_on,
            event.amount,
            drawn,
        ));
        self.sync_principal();
    }

    /// Payment waterfall: interest, then advances oldest first, then credit.
    fn receive_payment(&mut self, amount: Decimal) {
        let mut remaining = amount;

        if !self.state.interest_payable.is_zero() {
            remaining = self.pay_interest(remaining);
            if remaining.is_zero() {
                return;
            }
        }

        if !self.state.total_outstanding_principal.is_zero() {
            remaining = self.pay_advances(remaining);
            if remaining.is_zero() {
                return;
            }
        }

        self.state.future_payment_credit += remaining;
    }

    /// Returns what is left of the payment.
    fn pay_interest(&mut self, payment: Decimal) -> Decimal {
        let (interest_paid, remaining) = if payment >= self.state.interest_payable {
            (self.state.interest_payable, payment - self.state.interest_payable)
        } else {
            (payment, Decimal::zero())
        };

        self.state.interest_payable -= interest_paid;
        self.state.interest_paid_cumulative += interest_paid;
        remaining
    }

    /// Returns what is left of the payment once every advance is repaid.
    fn pay_advances(&mut self, payment: Decimal) -> Decimal {
        let mut remaining = payment;
        for advance in self.state.advances.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            if !advance.is_open() {
                continue;
            }
            let (balance, left) = subtract_smaller_from_larger(advance.outstanding_balance, remaining);
            advance.outstanding_balance = balance;
            remaining = left;
        }

        self.sync_principal();
        remaining
    }

    /// Principal total equals the sum of advance balances digit for digit,
    /// including once balances reach 28 significant digits.
    fn sync_principal(&mut self) {
        self.state.total_outstanding_principal = self.state.sum_of_advance_balances();
    }

    /// Close the replay: accrue through the end of `as_of` and report.
    pub fn finish(mut self, as_of: NaiveDate) -> Snapshot {
        match as_of.succ_opt() {
            Some(boundary) => self.accrue_interest(boundary),
            None => {
                // No representable next day: charge the cutoff day directly.
                self.accrue_interest(as_of);
                self.state.interest_payable +=
                    self.state.total_outstanding_principal * self.interest_rate;
            }
        }

        let state = self.state;
        Snapshot {
            as_of,
            advances: state.advances,
            total_outstanding_principal: state.total_outstanding_principal,
            interest_payable: state.interest_payable,
            interest_paid_cumulative: state.interest_paid_cumulative,
            future_payment_credit: state.future_payment_credit,
        }
    }

    /// Apply every event dated on or before `as_of`, then [`finish`](Self::finish).
    ///
    /// Reading stops at the first event dated after `as_of`.
    pub fn replay<I>(mut self, events: I, as_of: NaiveDate) -> Snapshot
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events
            .into_iter()
            .take_while(|event| event.occurred_on <= as_of)
        {
            self.apply(&event);
        }
        self.finish(as_of)
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INTEREST_RATE)
    }
}
