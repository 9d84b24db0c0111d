//! Capability and ownership checks shared by the services

use tracing::warn;

use domain_identity::{Actor, Capability};
use domain_policy::Policy;

use crate::error::LifecycleError;

/// Fails with `Forbidden` unless the caller holds `capability`
pub(crate) fn require(
    actor: &Actor,
    capability: Capability,
    action: &str,
) -> Result<(), LifecycleError> {
    if actor.can(capability) {
        return Ok(());
    }
    warn!(user = %actor.user_id, role = %actor.role, action, "Permission denied");
    Err(LifecycleError::forbidden(format!(
        "role {} may not {}",
        actor.role, action
    )))
}

/// Fails with `PolicyNotOwned` unless the caller owns the policy or may act on any policy
pub(crate) fn ensure_may_act_on(actor: &Actor, policy: &Policy) -> Result<(), LifecycleError> {
    if actor.owns_or_can(policy.owner_id, Capability::ActOnAnyPolicy) {
        return Ok(());
    }
    warn!(
        user = %actor.user_id,
        policy_number = %policy.policy_number,
        "Policy not owned by caller"
    );
    Err(LifecycleError::PolicyNotOwned(policy.id))
}
