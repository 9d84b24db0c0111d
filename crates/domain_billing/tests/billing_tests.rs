//! Tests for premium payment recording

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, PolicyId, UserId};
use domain_billing::{BillingError, NewPayment, Payment, PaymentMethod, PaymentStatus};

fn record(amount: Decimal, owner: UserId, recorder: UserId) -> Result<Payment, BillingError> {
    Payment::record("PAY0000000001".into(), owner, recorder, input(amount), Currency::USD)
}

fn input(amount: Decimal) -> NewPayment {
    NewPayment {
        policy_id: PolicyId::new(),
        amount,
        method: PaymentMethod::CreditCard,
        transaction_id: Some("txn-42".to_string()),
        description: Some("January premium".to_string()),
    }
}

mod recording {
    use super::*;

    #[test]
    fn test_payment_is_completed_on_record() {
        let owner = UserId::new();
        let payment = record(dec!(200), owner, owner).unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.is_completed());
        assert_eq!(payment.amount.amount(), dec!(200));
    }

    #[test]
    fn test_recorder_may_differ_from_owner() {
        let owner = UserId::new();
        let admin = UserId::new();
        let payment = record(dec!(10), owner, admin).unwrap();
        assert_eq!(payment.owner_id, owner);
        assert_eq!(payment.recorded_by, admin);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        for amount in [dec!(0), dec!(-5)] {
            let owner = UserId::new();
            let result = record(amount, owner, owner);
            assert!(matches!(result, Err(BillingError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_amounts_that_round_to_zero_rejected() {
        for amount in [dec!(0.001), dec!(0.004)] {
            let owner = UserId::new();
            let result = record(amount, owner, owner);
            assert!(matches!(result, Err(BillingError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_amount_above_maximum_rejected() {
        let owner = UserId::new();
        let result = record(Decimal::MAX / dec!(2), owner, owner);
        assert!(matches!(result, Err(BillingError::InvalidAmount(_))));
    }

    #[test]
    fn test_amount_rounded_to_cents() {
        let owner = UserId::new();
        let payment = record(dec!(19.995), owner, owner).unwrap();
        assert_eq!(payment.amount.amount(), dec!(20.00));
    }
}

mod methods {
    use super::*;

    #[test]
    fn test_method_roundtrip() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_method() {
        assert!(matches!(
            "barter".parse::<PaymentMethod>(),
            Err(BillingError::UnknownPaymentMethod(_))
        ));
    }

    #[test]
    fn test_method_json_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }
}
