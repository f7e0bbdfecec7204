//! Fixed-width text report of a balance snapshot.

use crate::domain::DATE_FORMAT;
use crate::engine::Snapshot;
use std::fmt;

const RULE: &str = "----------------------------------------------------------";

/// Render `snapshot` in the column layout downstream tooling parses.
///
/// Advances are numbered from 1 in origination order. Amounts are rounded to
/// cents here and nowhere else.
pub fn render_balances(snapshot: &Snapshot) -> String {
    BalanceReport(snapshot).to_string()
}

/// Display adapter writing the balance report.
struct BalanceReport<'a>(&'a Snapshot);

impl fmt::Display for BalanceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;

        writeln!(f, "Advances:")?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "{:>10}{:>11}{:>17}{:>20}",
            "Identifier", "Date", "Initial Amt", "Current Balance"
        )?;

        for (index, advance) in snapshot.advances.iter().enumerate() {
            writeln!(
                f,
                "{:>10}{:>11}{:>17}{:>20}",
                index + 1,
                advance.origination_date.format(DATE_FORMAT).to_string(),
                advance.initial_amount.to_display_string(),
                advance.outstanding_balance.to_display_string(),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Summary Statistics:")?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "Aggregate Advance Balance: {:>31}",
            snapshot.total_outstanding_principal.to_display_string()
        )?;
        writeln!(
            f,
            "Interest Payable Balance: {:>32}",
            snapshot.interest_payable.to_display_string()
        )?;
        writeln!(
            f,
            "Total Interest Paid: {:>37}",
            snapshot.interest_paid_cumulative.to_display_string()
        )?;
        writeln!(
            f,
            "Balance Applicable to Future Advances: {:>19}",
            snapshot.future_payment_credit.to_display_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Event};
    use crate::engine::{compute, DEFAULT_INTEREST_RATE};
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_render_matches_column_layout() {
        let events = vec![
            Event::advance(11, d("1000"), date("2023-01-01")),
            Event::payment(12, d("3.5"), date("2023-01-11")),
        ];
        let snapshot = compute(events, date("2023-01-11"), DEFAULT_INTEREST_RATE);
        let text = render_balances(&snapshot);

        let expected = [
            "Advances:",
            "----------------------------------------------------------",
            "Identifier       Date      Initial Amt     Current Balance",
            "         1 2023-01-01          1000.00             1000.00",
            "",
            "Summary Statistics:",
            "----------------------------------------------------------",
            "Aggregate Advance Balance:                         1000.00",
            "Interest Payable Balance:                             0.35",
            "Total Interest Paid:                                  3.50",
            "Balance Applicable to Future Advances:                0.00",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_every_line_is_58_columns() {
        let events = vec![
            Event::advance(1, d("123456.789"), date("2023-01-01")),
            Event::advance(2, d("5"), date("2023-02-01")),
        ];
        let snapshot = compute(events, date("2023-03-01"), DEFAULT_INTEREST_RATE);
        for line in render_balances(&snapshot).lines() {
            if line.is_empty() || line.ends_with(':') {
                continue;
            }
            assert_eq!(line.len(), 58, "bad width: {:?}", line);
        }
    }

    #[test]
    fn test_render_without_advances() {
        let snapshot = compute(Vec::new(), date("2023-01-01"), DEFAULT_INTEREST_RATE);
        let text = render_balances(&snapshot);
        assert!(text.contains("Identifier       Date"));
        assert!(text.contains("Aggregate Advance Balance:                            0.00"));
    }
}
