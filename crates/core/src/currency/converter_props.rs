//! Property-based tests for currency conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::CurrencyId;

use super::converter::CurrencyConverter;
use super::types::Currency;

/// Strategy to generate amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn non_base(id: u128, rate: Decimal) -> Currency {
    Currency {
        id: CurrencyId::from_u128(id),
        code: format!("C{id}"),
        symbol: String::new(),
        decimals: 2,
        is_base: false,
        rate,
    }
}

fn tolerance() -> Decimal {
    Decimal::new(1, 6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting into the base and back recovers the amount.
    #[test]
    fn prop_from_base_inverts_to_base(amount in positive_amount(), rate in positive_rate()) {
        let currency = non_base(2, rate);
        let base = CurrencyConverter::to_base(amount, &currency).unwrap();
        let back = CurrencyConverter::from_base(base, &currency).unwrap();
        prop_assert!((back - amount).abs() <= tolerance(), "{} vs {}", back, amount);
    }

    /// A round trip A -> B -> A is consistent within rounding tolerance.
    #[test]
    fn prop_convert_round_trip(
        amount in positive_amount(),
        rate_a in positive_rate(),
        rate_b in positive_rate(),
    ) {
        let a = non_base(2, rate_a);
        let b = non_base(3, rate_b);
        let there = CurrencyConverter::convert(amount, &a, &b).unwrap();
        let back = CurrencyConverter::convert(there, &b, &a).unwrap();
        prop_assert!((back - amount).abs() <= tolerance(), "{} vs {}", back, amount);
    }

    /// Conversion never changes the sign of an amount.
    #[test]
    fn prop_convert_preserves_sign(amount in positive_amount(), rate in positive_rate()) {
        let currency = non_base(2, rate);
        prop_assert!(CurrencyConverter::to_base(amount, &currency).unwrap() > Decimal::ZERO);
        prop_assert!(CurrencyConverter::to_base(-amount, &currency).unwrap() < Decimal::ZERO);
    }
}
