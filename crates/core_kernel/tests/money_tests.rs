//! Unit tests for the Money module
//!
//! Tests cover money creation, arithmetic, currency handling, rounding and
//! the copay rate used by the entitlement split.

use core_kernel::{Money, Currency, MoneyError, Rate};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_positive_false_for_zero() {
        assert!(!Money::zero(Currency::USD).is_positive());
    }

    #[test]
    fn test_is_negative_for_refund_like_amounts() {
        let m = Money::new(dec!(-0.01), Currency::USD);
        assert!(m.is_negative());
        assert!(!m.is_positive());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_sub_same_currency() {
        let coverage = Money::new(dec!(1000), Currency::USD);
        let used = Money::new(dec!(400), Currency::USD);
        assert_eq!(coverage.checked_sub(&used).unwrap().amount(), dec!(600));
    }

    #[test]
    fn test_checked_sub_currency_mismatch() {
        let usd = Money::new(dec!(10), Currency::USD);
        let gbp = Money::new(dec!(10), Currency::GBP);
        assert_eq!(
            usd.checked_sub(&gbp),
            Err(MoneyError::CurrencyMismatch("USD".into(), "GBP".into()))
        );
    }

    #[test]
    fn test_checked_min_picks_smaller() {
        let a = Money::new(dec!(250), Currency::USD);
        let b = Money::new(dec!(100), Currency::USD);
        assert_eq!(a.checked_min(&b).unwrap(), b);
    }

    #[test]
    fn test_sum_of_payments() {
        let items = vec![
            Money::new(dec!(100.00), Currency::USD),
            Money::new(dec!(250.50), Currency::USD),
            Money::new(dec!(0.25), Currency::USD),
        ];
        let total = Money::sum(Currency::USD, &items).unwrap();
        assert_eq!(total.amount(), dec!(350.75));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum(Currency::EUR, &[]).unwrap();
        assert!(total.is_zero());
        assert_eq!(total.currency(), Currency::EUR);
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let items = vec![
            Money::new(dec!(1), Currency::USD),
            Money::new(dec!(1), Currency::EUR),
        ];
        assert!(Money::sum(Currency::USD, &items).is_err());
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_add_operator_panics_on_mismatch() {
        let _ = Money::new(dec!(1), Currency::USD) + Money::new(dec!(1), Currency::EUR);
    }

    #[test]
    fn test_negation() {
        let m = -Money::new(dec!(5), Currency::USD);
        assert_eq!(m.amount(), dec!(-5));
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_currency_uses_bankers_rounding() {
        assert_eq!(
            Money::new(dec!(10.125), Currency::USD).round_to_currency().amount(),
            dec!(10.12)
        );
        assert_eq!(
            Money::new(dec!(10.135), Currency::USD).round_to_currency().amount(),
            dec!(10.14)
        );
    }

    #[test]
    fn test_round_jpy_to_whole_units() {
        let m = Money::new(dec!(100.5), Currency::JPY).round_to_currency();
        assert_eq!(m.amount(), dec!(100));
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_parse_codes_case_insensitively() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::EUR);
    }

    #[test]
    fn test_parse_unknown_code() {
        assert_eq!(
            "XYZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency("XYZ".into()))
        );
    }

    #[test]
    fn test_display_and_default() {
        assert_eq!(Currency::default(), Currency::USD);
        assert_eq!(Money::new(dec!(12.5), Currency::USD).to_string(), "$ 12.50");
    }

    #[test]
    fn test_serializes_as_uppercase_code() {
        assert_eq!(serde_json::to_string(&Currency::GBP).unwrap(), "\"GBP\"");
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_from_percentage() {
        let rate = Rate::from_percentage(dec!(20));
        assert_eq!(rate.as_decimal(), dec!(0.2));
        assert_eq!(rate.as_percentage(), dec!(20));
        assert_eq!(rate.to_string(), "20%");
    }

    #[test]
    fn test_proportion_bounds() {
        assert!(Rate::from_percentage(dec!(0)).is_proportion());
        assert!(Rate::from_percentage(dec!(100)).is_proportion());
        assert!(!Rate::from_percentage(dec!(100.01)).is_proportion());
        assert!(!Rate::from_percentage(dec!(-1)).is_proportion());
    }

    #[test]
    fn test_apply_fractional_copay() {
        let rate = Rate::from_percentage(dec!(12.5));
        let base = Money::new(dec!(80), Currency::USD);
        assert_eq!(rate.apply(&base).amount(), dec!(10));
    }
}
