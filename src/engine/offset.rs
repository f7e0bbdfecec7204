use crate::domain::Decimal;

/// Offset two non-negative amounts against each other.
///
/// The smaller one is zeroed and the larger one is reduced by it. The returned
/// pair keeps the order of the arguments, so `(balance, payment)` comes back as
/// `(new_balance, payment_left)`.
pub fn subtract_smaller_from_larger(a: Decimal, b: Decimal) -> (Decimal, Decimal) {
    if a < b {
        (Decimal::zero(), b - a)
    } else {
        (a - b, Decimal::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_first_smaller() {
        assert_eq!(subtract_smaller_from_larger(d("300"), d("500")), (d("0"), d("200")));
    }

    #[test]
    fn test_first_larger() {
        assert_eq!(subtract_smaller_from_larger(d("1000"), d("1200.5")), (d("0"), d("200.5")));
        assert_eq!(subtract_smaller_from_larger(d("1200.5"), d("1000")), (d("200.5"), d("0")));
    }

    #[test]
    fn test_equal_amounts_cancel() {
        assert_eq!(subtract_smaller_from_larger(d("42.42"), d("42.42")), (d("0"), d("0")));
    }

    #[test]
    fn test_zero_operand() {
        assert_eq!(subtract_smaller_from_larger(d("0"), d("7")), (d("0"), d("7")));
        assert_eq!(subtract_smaller_from_larger(d("7"), d("0")), (d("7"), d("0")));
    }
}
