//! Dashboard and summary reports
//!
//! Totals are plain decimals in the operating currency.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_billing::PaymentStatus;
use domain_claims::{Claim, ClaimStatus};
use domain_identity::{Actor, Capability};
use domain_policy::PolicyStatus;

use crate::access::require;
use crate::error::LifecycleError;
use crate::ports::{ClaimFilter, InsuranceStore, PaymentFilter, PolicyFilter};
use crate::queries::scope;

/// Inclusive calendar-date range; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Converts to a half-open `[from, before)` instant range
    fn bounds(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), LifecycleError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(LifecycleError::validation(format!(
                    "start_date {} is after end_date {}",
                    start, end
                )));
            }
        }
        let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let from = self.start_date.and_then(midnight);
        let before = self.end_date.and_then(|d| d.succ_opt()).and_then(midnight);
        Ok((from, before))
    }
}

/// System-wide figures shown to administrators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_users: u64,
    pub total_policies: u64,
    pub active_policies: u64,
    pub total_claims: u64,
    /// Claims awaiting a decision (submitted or under review)
    pub pending_claims: u64,
    /// Sum of completed payments
    pub total_revenue: Decimal,
}

/// The caller's own figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalStats {
    pub total_policies: u64,
    pub active_policies: u64,
    pub total_claims: u64,
    pub total_payments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardStats {
    System(SystemStats),
    Personal(PersonalStats),
}

/// Claim counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub submitted: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub paid: u64,
}

impl StatusCounts {
    fn record(&mut self, status: ClaimStatus) {
        let slot = match status {
            ClaimStatus::Submitted => &mut self.submitted,
            ClaimStatus::UnderReview => &mut self.under_review,
            ClaimStatus::Approved => &mut self.approved,
            ClaimStatus::Rejected => &mut self.rejected,
            ClaimStatus::Paid => &mut self.paid,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsSummary {
    pub total_claims: u64,
    pub total_claimed_amount: Decimal,
    pub total_approved_amount: Decimal,
    /// Insurer side of the approved amount
    pub total_insurer_share: Decimal,
    pub by_status: StatusCounts,
}

impl ClaimsSummary {
    fn from_claims(claims: &[Claim]) -> Result<Self, LifecycleError> {
        let mut by_status = StatusCounts::default();
        let mut claimed = Decimal::ZERO;
        let mut approved = Decimal::ZERO;
        let mut insurer = Decimal::ZERO;
        for claim in claims {
            by_status.record(claim.status);
            accumulate(&mut claimed, claim.claimed_amount.amount())?;
            if let Some(amount) = claim.approved_amount {
                accumulate(&mut approved, amount.amount())?;
            }
            if let Some(split) = claim.entitlement {
                accumulate(&mut insurer, split.insurer_share.amount())?;
            }
        }
        Ok(Self {
            total_claims: claims.len() as u64,
            total_claimed_amount: claimed,
            total_approved_amount: approved,
            total_insurer_share: insurer,
            by_status,
        })
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal) -> Result<(), LifecycleError> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| LifecycleError::Internal("report total overflowed".to_string()))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_payments: u64,
    pub total_revenue: Decimal,
    /// Zero when there are no payments
    pub average_payment: Decimal,
    pub by_method: BTreeMap<String, Decimal>,
}

#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn InsuranceStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn InsuranceStore>) -> Self {
        Self { store }
    }

    /// Dashboard figures: system-wide for admins, personal otherwise
    pub async fn dashboard(&self, actor: &Actor) -> Result<DashboardStats, LifecycleError> {
        let mut tx = self.store.begin().await?;
        let owner_id = scope(actor, Capability::ViewReports);

        let all_policies = PolicyFilter {
            owner_id,
            ..Default::default()
        };
        let active_policies = PolicyFilter {
            status: Some(PolicyStatus::Active),
            ..all_policies.clone()
        };
        let all_claims = ClaimFilter {
            owner_id,
            ..Default::default()
        };

        let total_policies = tx.count_policies(&all_policies).await?;
        let active_policies = tx.count_policies(&active_policies).await?;
        let total_claims = tx.count_claims(&all_claims).await?;

        if owner_id.is_some() {
            let total_payments = tx
                .count_payments(&PaymentFilter {
                    owner_id,
                    ..Default::default()
                })
                .await?;
            return Ok(DashboardStats::Personal(PersonalStats {
                total_policies,
                active_policies,
                total_claims,
                total_payments,
            }));
        }

        let mut pending_claims = 0;
        for status in [ClaimStatus::Submitted, ClaimStatus::UnderReview] {
            pending_claims += tx
                .count_claims(&ClaimFilter {
                    status: Some(status),
                    ..Default::default()
                })
                .await?;
        }
        let completed = tx
            .list_payments(&PaymentFilter {
                status: Some(PaymentStatus::Completed),
                ..Default::default()
            })
            .await?;

        let mut revenue = Decimal::ZERO;
        for payment in &completed {
            accumulate(&mut revenue, payment.amount.amount())?;
        }

        Ok(DashboardStats::System(SystemStats {
            total_users: tx.count_users().await?,
            total_policies,
            active_policies,
            total_claims,
            pending_claims,
            total_revenue: revenue,
        }))
    }

    /// Claim totals over claims filed within `range`, owner-scoped for non-admins
    pub async fn claims_summary(
        &self,
        actor: &Actor,
        range: DateRange,
    ) -> Result<ClaimsSummary, LifecycleError> {
        let (claimed_from, claimed_before) = range.bounds()?;
        let filter = ClaimFilter {
            owner_id: scope(actor, Capability::ViewReports),
            claimed_from,
            claimed_before,
            ..Default::default()
        };

        let mut tx = self.store.begin().await?;
        let claims = tx.list_claims(&filter).await?;
        ClaimsSummary::from_claims(&claims)
    }

    /// Completed payments within `range` (admin only)
    pub async fn revenue_summary(
        &self,
        actor: &Actor,
        range: DateRange,
    ) -> Result<RevenueSummary, LifecycleError> {
        require(actor, Capability::ViewReports, "view revenue reports")?;
        let (paid_from, paid_before) = range.bounds()?;

        let mut tx = self.store.begin().await?;
        let payments = tx
            .list_payments(&PaymentFilter {
                status: Some(PaymentStatus::Completed),
                paid_from,
                paid_before,
                ..Default::default()
            })
            .await?;

        let mut by_method: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut total = Decimal::ZERO;
        for payment in &payments {
            accumulate(&mut total, payment.amount.amount())?;
            let method_total = by_method
                .entry(payment.method.as_str().to_string())
                .or_default();
            accumulate(method_total, payment.amount.amount())?;
        }
        let average = if payments.is_empty() {
            Decimal::ZERO
        } else {
            (total / Decimal::from(payments.len() as u64)).round_dp(2)
        };

        Ok(RevenueSummary {
            total_payments: payments.len() as u64,
            total_revenue: total,
            average_payment: average,
            by_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, Money, PolicyId, UserId};
    use domain_claims::NewClaim;
    use rust_decimal_macros::dec;

    #[test]
    fn test_date_range_end_is_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        );
        let (from, before) = range.bounds().unwrap();
        assert_eq!(from.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(before.unwrap().to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }

    fn claim(amount: Decimal) -> Claim {
        let owner = UserId::new();
        Claim::submit(
            "CLM0000000001".to_string(),
            owner,
            owner,
            NewClaim {
                policy_id: PolicyId::new(),
                service_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                provider_name: "City Clinic".to_string(),
                diagnosis_code: None,
                procedure_code: None,
                claimed_amount: amount,
                notes: None,
            },
            Currency::USD,
        )
        .unwrap()
    }

    #[test]
    fn test_claims_summary_totals() {
        let summary = ClaimsSummary::from_claims(&[claim(dec!(100)), claim(dec!(250.50))]).unwrap();
        assert_eq!(summary.total_claims, 2);
        assert_eq!(summary.total_claimed_amount, dec!(350.50));
        assert_eq!(summary.by_status.submitted, 2);
    }

    #[test]
    fn test_claims_summary_overflow_is_an_error() {
        let mut huge = claim(dec!(1));
        huge.claimed_amount = Money::new(Decimal::MAX / dec!(2) + dec!(1), Currency::USD);
        let result = ClaimsSummary::from_claims(&[huge.clone(), huge]);
        assert!(matches!(result, Err(LifecycleError::Internal(_))));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        );
        assert!(range.bounds().is_err());
    }
}
