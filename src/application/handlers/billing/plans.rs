//! Membership plan handlers.
//!
//! Plans are never deleted; admins deactivate them with `is_active = false`
//! so existing subscriptions keep their reference.

use std::sync::Arc;

use crate::domain::billing::{MembershipPlan, PlanInput};
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::PlanRepository;

#[derive(Debug, Clone)]
pub struct UpdatePlanCommand {
    pub id: PlanId,
    pub input: PlanInput,
}

pub struct ListPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    /// Plans ordered by price.
    pub async fn handle(&self, include_inactive: bool) -> Result<Vec<MembershipPlan>, DomainError> {
        self.plans.list(include_inactive).await
    }
}

pub struct CreatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, input: PlanInput) -> Result<MembershipPlan, DomainError> {
        let plan = MembershipPlan::create(input)?;
        self.plans.create(&plan).await?;
        tracing::info!(plan_id = %plan.id, price_id = %plan.stripe_price_id, "Plan created");
        Ok(plan)
    }
}

pub struct UpdatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl UpdatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, cmd: UpdatePlanCommand) -> Result<MembershipPlan, DomainError> {
        let mut plan = self
            .plans
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::not_found("plan", cmd.id))?;

        plan.update(cmd.input)?;
        self.plans.update(&plan).await?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlanRepository;
    use crate::domain::billing::BillingInterval;
    use crate::domain::foundation::ErrorCode;

    pub(crate) fn plan_input(name: &str, price_cents: i64, price_id: &str) -> PlanInput {
        PlanInput {
            name: name.to_string(),
            description: None,
            price_cents,
            currency: "EUR".to_string(),
            billing_interval: BillingInterval::Month,
            stripe_price_id: price_id.to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn deactivated_plan_is_hidden_from_public_list() {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let basic = CreatePlanHandler::new(plans.clone())
            .handle(plan_input("Basic", 4900, "price_basic"))
            .await
            .unwrap();
        CreatePlanHandler::new(plans.clone())
            .handle(plan_input("Unlimited", 8900, "price_unlimited"))
            .await
            .unwrap();

        let mut retired = plan_input("Basic", 4900, "price_basic");
        retired.is_active = false;
        UpdatePlanHandler::new(plans.clone())
            .handle(UpdatePlanCommand {
                id: basic.id,
                input: retired,
            })
            .await
            .unwrap();

        let list = ListPlansHandler::new(plans.clone());
        let public: Vec<_> = list.handle(false).await.unwrap();
        let all = list.handle(true).await.unwrap();

        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Unlimited");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].currency, "eur");
    }

    #[tokio::test]
    async fn duplicate_price_id_conflicts() {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let create = CreatePlanHandler::new(plans);

        create.handle(plan_input("A", 100, "price_same")).await.unwrap();
        let err = create
            .handle(plan_input("B", 200, "price_same"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn zero_price_fails_validation() {
        let err = CreatePlanHandler::new(Arc::new(InMemoryPlanRepository::new()))
            .handle(plan_input("Free", 0, "price_free"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
