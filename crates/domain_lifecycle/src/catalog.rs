//! Plan catalog

use std::sync::Arc;

use tracing::{info, instrument};

use core_kernel::PlanId;
use domain_identity::{Actor, Capability};
use domain_policy::{InsurancePlan, NewPlan};

use crate::access::require;
use crate::error::LifecycleError;
use crate::ports::{InsuranceStore, Page};

#[derive(Clone)]
pub struct PlanCatalog {
    store: Arc<dyn InsuranceStore>,
}

impl PlanCatalog {
    pub fn new(store: Arc<dyn InsuranceStore>) -> Self {
        Self { store }
    }

    /// Adds an active plan to the catalog (admin only)
    #[instrument(skip(self, actor, input), fields(admin = %actor.user_id, name = %input.name))]
    pub async fn create_plan(
        &self,
        actor: &Actor,
        input: NewPlan,
    ) -> Result<InsurancePlan, LifecycleError> {
        require(actor, Capability::ManageCatalog, "create plans")?;
        let plan = InsurancePlan::create(input)?;

        let mut tx = self.store.begin().await?;
        tx.insert_plan(&plan).await?;
        tx.commit().await?;

        info!(plan_id = %plan.id, plan_type = %plan.plan_type, "Insurance plan created");
        Ok(plan)
    }

    /// Active plans, oldest first
    pub async fn list_plans(&self, page: Page) -> Result<Vec<InsurancePlan>, LifecycleError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_active_plans(page).await?)
    }

    pub async fn get_plan(&self, plan_id: PlanId) -> Result<InsurancePlan, LifecycleError> {
        let mut tx = self.store.begin().await?;
        tx.find_plan(plan_id)
            .await?
            .ok_or_else(|| LifecycleError::plan_not_found(plan_id))
    }

    /// Retires a plan; existing policies keep their terms
    #[instrument(skip(self, actor), fields(admin = %actor.user_id))]
    pub async fn deactivate_plan(
        &self,
        actor: &Actor,
        plan_id: PlanId,
    ) -> Result<InsurancePlan, LifecycleError> {
        require(actor, Capability::ManageCatalog, "deactivate plans")?;

        let mut tx = self.store.begin().await?;
        let mut plan = tx
            .find_plan(plan_id)
            .await?
            .ok_or_else(|| LifecycleError::plan_not_found(plan_id))?;
        plan.deactivate();
        tx.update_plan(&plan).await?;
        tx.commit().await?;

        info!(plan_id = %plan.id, "Insurance plan deactivated");
        Ok(plan)
    }
}
