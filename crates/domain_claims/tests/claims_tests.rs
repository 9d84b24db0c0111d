//! Tests for claim review and the entitlement split

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, PolicyId, Rate, UserId};

use domain_claims::{
    compute_entitlement, Accumulators, Claim, ClaimError, ClaimStatus, CostSharingTerms,
    NewClaim, ReviewDecision,
};

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn simple_terms() -> CostSharingTerms {
    CostSharingTerms {
        coverage_amount: usd(dec!(1000)),
        deductible: usd(dec!(0)),
        copay: Rate::from_percentage(dec!(20)),
        max_out_of_pocket: None,
    }
}

fn no_usage() -> Accumulators {
    Accumulators::zero(Currency::USD)
}

fn submit(amount: Decimal) -> Result<Claim, ClaimError> {
    let owner = UserId::new();
    Claim::submit(
        "CLM0000000001".to_string(),
        owner,
        owner,
        NewClaim {
            policy_id: PolicyId::new(),
            service_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            provider_name: "City Clinic".to_string(),
            diagnosis_code: Some("J20.9".to_string()),
            procedure_code: Some("99213".to_string()),
            claimed_amount: amount,
            notes: None,
        },
        Currency::USD,
    )
}

fn submitted(amount: Decimal) -> Claim {
    submit(amount).unwrap()
}

/// Reviews against the simple plan with nothing consumed yet
fn apply(
    claim: &mut Claim,
    status: ClaimStatus,
    amount: Option<Decimal>,
) -> Result<(), ClaimError> {
    claim.review(UserId::new(), decide(status, amount), &simple_terms(), &no_usage())
}

fn decide(status: ClaimStatus, amount: Option<Decimal>) -> ReviewDecision {
    ReviewDecision {
        status,
        approved_amount: amount,
        notes: None,
    }
}

mod submission {
    use super::*;

    #[test]
    fn test_new_claim_is_submitted() {
        let claim = submitted(dec!(500));
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.approved_amount.is_none());
        assert!(claim.reviewed_by.is_none());
    }

    #[test]
    fn test_zero_or_negative_amount_rejected() {
        for amount in [dec!(0), dec!(-10)] {
            assert!(matches!(submit(amount), Err(ClaimError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_amount_rounding_to_zero_rejected() {
        for amount in [dec!(0.001), dec!(0.004)] {
            assert!(matches!(submit(amount), Err(ClaimError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_amount_above_maximum_rejected() {
        let result = submit(Decimal::MAX / dec!(2) + dec!(1));
        assert!(matches!(result, Err(ClaimError::InvalidAmount(_))));
    }

    #[test]
    fn test_smallest_cent_is_accepted() {
        assert_eq!(submitted(dec!(0.006)).claimed_amount.amount(), dec!(0.01));
    }
}

mod review {
    use super::*;

    #[test]
    fn test_approval_scenario_patient_pays_copay() {
        let mut claim = submitted(dec!(500));
        let reviewer = UserId::new();
        let decision = decide(ClaimStatus::Approved, Some(dec!(500)));
        claim
            .review(reviewer, decision, &simple_terms(), &no_usage())
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.approved_amount.unwrap().amount(), dec!(500));
        let split = claim.entitlement.unwrap();
        assert_eq!(split.patient_share.amount(), dec!(100));
        assert_eq!(split.insurer_share.amount(), dec!(400));
        assert_eq!(claim.reviewed_by, Some(reviewer));
        assert!(claim.review_date.is_some());
    }

    #[test]
    fn test_approval_above_claimed_amount_rejected() {
        let mut claim = submitted(dec!(500));
        let before = claim.clone();
        let result = claim.review(
            UserId::new(),
            decide(ClaimStatus::Approved, Some(dec!(500.01))),
            &simple_terms(),
            &no_usage(),
        );
        assert!(matches!(result, Err(ClaimError::InvalidAmount(_))));
        assert_eq!(claim, before);
    }

    #[test]
    fn test_negative_approval_rejected() {
        let mut claim = submitted(dec!(500));
        let result = claim.review(
            UserId::new(),
            decide(ClaimStatus::Approved, Some(dec!(-1))),
            &simple_terms(),
            &no_usage(),
        );
        assert!(matches!(result, Err(ClaimError::InvalidAmount(_))));
    }

    #[test]
    fn test_amount_with_rejection_is_invalid() {
        let mut claim = submitted(dec!(500));
        let result = claim.review(
            UserId::new(),
            decide(ClaimStatus::Rejected, Some(dec!(100))),
            &simple_terms(),
            &no_usage(),
        );
        assert!(matches!(result, Err(ClaimError::InvalidAmount(_))));
    }

    #[test]
    fn test_default_approval_capped_by_remaining_coverage() {
        let mut claim = submitted(dec!(5000));
        apply(&mut claim, ClaimStatus::Approved, None).unwrap();
        assert_eq!(claim.approved_amount.unwrap().amount(), dec!(1000));
    }

    #[test]
    fn test_rejection_zeroes_approved_amount() {
        let mut claim = submitted(dec!(500));
        apply(&mut claim, ClaimStatus::Rejected, None).unwrap();
        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert!(claim.approved_amount.unwrap().is_zero());
        assert!(claim.entitlement.is_none());
    }

    #[test]
    fn test_terminal_states_refuse_every_decision() {
        let mut paid = submitted(dec!(200));
        apply(&mut paid, ClaimStatus::Approved, None).unwrap();
        apply(&mut paid, ClaimStatus::Paid, None).unwrap();

        let mut rejected = submitted(dec!(200));
        apply(&mut rejected, ClaimStatus::Rejected, None).unwrap();

        for claim in [&mut paid, &mut rejected] {
            for target in ClaimStatus::ALL {
                let result = apply(claim, target, None);
                assert!(
                    matches!(result, Err(ClaimError::InvalidStatusTransition { .. })),
                    "{} -> {} should fail",
                    claim.status,
                    target
                );
            }
        }
    }

    #[test]
    fn test_paid_keeps_split() {
        let mut claim = submitted(dec!(500));
        apply(&mut claim, ClaimStatus::UnderReview, None).unwrap();
        apply(&mut claim, ClaimStatus::Approved, Some(dec!(300))).unwrap();
        let split = claim.entitlement;
        apply(&mut claim, ClaimStatus::Paid, None).unwrap();
        assert_eq!(claim.entitlement, split);
        assert_eq!(claim.approved_amount.unwrap().amount(), dec!(300));
    }

    #[test]
    fn test_notes_replaced_when_given() {
        let mut claim = submitted(dec!(50));
        claim
            .review(
                UserId::new(),
                ReviewDecision {
                    status: ClaimStatus::UnderReview,
                    approved_amount: None,
                    notes: Some("requested itemised bill".to_string()),
                },
                &simple_terms(),
                &no_usage(),
            )
            .unwrap();
        assert_eq!(claim.notes.as_deref(), Some("requested itemised bill"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "under_review".parse::<ClaimStatus>().unwrap(),
            ClaimStatus::UnderReview
        );
        assert!("closed".parse::<ClaimStatus>().is_err());
    }
}

mod entitlement {
    use super::*;

    #[test]
    fn test_deductible_consumed_before_copay() {
        let terms = CostSharingTerms {
            coverage_amount: usd(dec!(10000)),
            deductible: usd(dec!(500)),
            copay: Rate::from_percentage(dec!(20)),
            max_out_of_pocket: None,
        };
        let split = compute_entitlement(usd(dec!(1500)), &terms, &no_usage()).unwrap();
        assert_eq!(split.deductible_applied.amount(), dec!(500));
        assert_eq!(split.coinsurance.amount(), dec!(200));
        assert_eq!(split.patient_share.amount(), dec!(700));
        assert_eq!(split.insurer_share.amount(), dec!(800));
    }

    #[test]
    fn test_deductible_partially_met_by_earlier_claims() {
        let terms = CostSharingTerms {
            coverage_amount: usd(dec!(10000)),
            deductible: usd(dec!(500)),
            copay: Rate::from_percentage(dec!(20)),
            max_out_of_pocket: None,
        };
        let acc = Accumulators {
            deductible_met: usd(dec!(300)),
            patient_out_of_pocket: usd(dec!(300)),
            insurer_paid: usd(dec!(0)),
        };
        let split = compute_entitlement(usd(dec!(1200)), &terms, &acc).unwrap();
        assert_eq!(split.deductible_applied.amount(), dec!(200));
        assert_eq!(split.coinsurance.amount(), dec!(200));
        assert_eq!(split.insurer_share.amount(), dec!(800));
    }

    #[test]
    fn test_out_of_pocket_cap() {
        let terms = CostSharingTerms {
            coverage_amount: usd(dec!(100000)),
            deductible: usd(dec!(1000)),
            copay: Rate::from_percentage(dec!(20)),
            max_out_of_pocket: Some(usd(dec!(2000))),
        };
        let acc = Accumulators {
            deductible_met: usd(dec!(1000)),
            patient_out_of_pocket: usd(dec!(1800)),
            insurer_paid: usd(dec!(3000)),
        };
        let split = compute_entitlement(usd(dec!(5000)), &terms, &acc).unwrap();
        assert_eq!(split.patient_share.amount(), dec!(200));
        assert_eq!(split.insurer_share.amount(), dec!(4800));
    }

    #[test]
    fn test_exhausted_coverage_leaves_uncovered_balance() {
        let terms = simple_terms();
        let acc = Accumulators {
            deductible_met: usd(dec!(0)),
            patient_out_of_pocket: usd(dec!(150)),
            insurer_paid: usd(dec!(900)),
        };
        let split = compute_entitlement(usd(dec!(500)), &terms, &acc).unwrap();
        assert_eq!(split.patient_share.amount(), dec!(100));
        assert_eq!(split.insurer_share.amount(), dec!(100));
        assert_eq!(split.uncovered.amount(), dec!(300));
        assert_eq!(split.patient_responsibility().amount(), dec!(400));
    }

    #[test]
    fn test_bankers_rounding_on_coinsurance() {
        let terms = CostSharingTerms {
            coverage_amount: usd(dec!(1000)),
            deductible: usd(dec!(0)),
            copay: Rate::from_percentage(dec!(12.5)),
            max_out_of_pocket: None,
        };
        // 0.125 * 10.20 = 1.275 -> 1.28 (nearest even cent is 8)
        let split = compute_entitlement(usd(dec!(10.20)), &terms, &no_usage()).unwrap();
        assert_eq!(split.coinsurance.amount(), dec!(1.28));
        // 0.125 * 10.00 = 1.25 exactly
        let split = compute_entitlement(usd(dec!(10.00)), &terms, &no_usage()).unwrap();
        assert_eq!(split.coinsurance.amount(), dec!(1.25));
    }

    #[test]
    fn test_accumulators_skip_unapproved_claims() {
        let mut approved = submitted(dec!(500));
        apply(&mut approved, ClaimStatus::Approved, None).unwrap();
        let pending = submitted(dec!(900));

        let acc = Accumulators::from_claims(Currency::USD, [&approved, &pending]).unwrap();
        assert_eq!(acc.insurer_paid.amount(), dec!(400));
        assert_eq!(acc.patient_out_of_pocket.amount(), dec!(100));
    }

    #[test]
    fn test_currency_mismatch_surfaces() {
        let eur = Money::new(dec!(10), Currency::EUR);
        let result = compute_entitlement(eur, &simple_terms(), &no_usage());
        assert!(matches!(result, Err(ClaimError::Financial(_))));
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn split_always_sums_to_approved(
            approved_cents in 0i64..10_000_000,
            deductible_cents in 0i64..500_000,
            copay in 0u32..=100,
            coverage_cents in 1i64..10_000_000,
            used_cents in 0i64..10_000_000,
        ) {
            let terms = CostSharingTerms {
                coverage_amount: Money::from_minor(coverage_cents, Currency::USD),
                deductible: Money::from_minor(deductible_cents, Currency::USD),
                copay: Rate::from_percentage(Decimal::from(copay)),
                max_out_of_pocket: None,
            };
            let acc = Accumulators {
                deductible_met: Money::zero(Currency::USD),
                patient_out_of_pocket: Money::zero(Currency::USD),
                insurer_paid: Money::from_minor(used_cents, Currency::USD),
            };
            let approved = Money::from_minor(approved_cents, Currency::USD);
            let split = compute_entitlement(approved, &terms, &acc).unwrap();

            prop_assert_eq!(split.patient_share + split.insurer_share + split.uncovered, approved);
            prop_assert!(!split.insurer_share.is_negative());
            prop_assert!(!split.uncovered.is_negative());
            let coverage_left =
                (terms.coverage_amount.amount() - acc.insurer_paid.amount()).max(Decimal::ZERO);
            prop_assert!(split.insurer_share.amount() <= coverage_left);
        }

        #[test]
        fn approved_never_exceeds_claimed(
            claimed_cents in 1i64..1_000_000,
            requested_cents in 0i64..2_000_000,
        ) {
            let mut claim = submitted(Decimal::new(claimed_cents, 2));
            let _ = claim.review(
                UserId::new(),
                decide(ClaimStatus::Approved, Some(Decimal::new(requested_cents, 2))),
                &simple_terms(),
                &no_usage(),
            );
            if let Some(approved) = claim.approved_amount {
                prop_assert!(approved.amount() <= claim.claimed_amount.amount());
            }
        }
    }
}
