use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::subscriptions::SubscriptionEntity;
use crate::value_objects::enums::{plans::Plan, subscription_statuses::SubscriptionStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub plan: Plan,
    pub price_minor: i32,
    pub description: &'static str,
}

impl PlanDto {
    /// The catalog is fixed: two paid tiers, priced as on the pricing page.
    pub fn catalog() -> Vec<PlanDto> {
        [Plan::Monthly, Plan::Yearly]
            .into_iter()
            .map(|plan| PlanDto {
                plan,
                price_minor: plan.price_minor(),
                description: plan.description(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOrderRequest {
    pub order_id: String,
    pub plan: Plan,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub paid_at: DateTime<Utc>,
    pub receipt_url: Option<String>,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            // Rows are only ever written from a parsed Plan, so an
            // unrecognized value means manual tampering; fall back to monthly.
            plan: Plan::from_str(&value.plan).unwrap_or(Plan::Monthly),
            status: SubscriptionStatus::from_str(&value.status),
            paid_at: value.paid_at,
            receipt_url: value.receipt_url,
        }
    }
}
