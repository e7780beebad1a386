use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `expected` and `actual` differ by no more than `tolerance`.
///
/// The sign of `tolerance` is ignored. A difference outside the decimal range
/// is never within tolerance.
pub fn within_tolerance(expected: Decimal, actual: Decimal, tolerance: Decimal) -> bool {
    expected
        .checked_sub(actual)
        .is_some_and(|difference| difference.abs() <= tolerance.abs())
}

/// Sum of `values`, or `None` once the running total leaves the decimal range.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Render an amount with at least 2 decimal places, trailing zeros beyond
/// that stripped.
pub fn format_amount(d: Decimal) -> String {
    let s = d.normalize().to_string();
    match s.find('.') {
        Some(dot) => {
            let decimals = s.len() - dot - 1;
            if decimals < 2 {
                format!("{s}{}", "0".repeat(2 - decimals))
            } else {
                s
            }
        }
        None => format!("{s}.00"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_cases() {
        assert_eq!(format_amount(dec!(210)), "210.00");
        assert_eq!(format_amount(dec!(210.0000)), "210.00");
        assert_eq!(format_amount(dec!(1210.5)), "1210.50");
        assert_eq!(format_amount(dec!(0.005)), "0.005");
        assert_eq!(format_amount(dec!(-12.3)), "-12.30");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_half_up(dec!(-2.345), 2), dec!(-2.35));
        assert_eq!(round_half_up(dec!(2.344), 2), dec!(2.34));
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(within_tolerance(dec!(210.00), dec!(210.01), dec!(0.01)));
        assert!(within_tolerance(dec!(210.01), dec!(210.00), dec!(0.01)));
        assert!(!within_tolerance(dec!(210.00), dec!(210.02), dec!(0.01)));
        assert!(within_tolerance(dec!(1), dec!(1.00), Decimal::ZERO));
        assert!(within_tolerance(dec!(210.00), dec!(210.01), dec!(-0.01)));
        assert!(!within_tolerance(Decimal::MAX, Decimal::MIN, Decimal::MAX));
    }

    #[test]
    fn sums_stop_at_the_decimal_range() {
        assert_eq!(checked_sum([dec!(1.50), dec!(2.25)]), Some(dec!(3.75)));
        assert_eq!(checked_sum(std::iter::empty()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, dec!(1)]), None);
        assert_eq!(checked_sum([Decimal::MAX, dec!(1), Decimal::MIN]), None);
    }
}
