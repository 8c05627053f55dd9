use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Most recent `active` subscription for the user, ordered by `paid_at`.
    /// Older rows are never mutated, so this is the sole source of the
    /// "current entitlement" derivation.
    async fn find_latest_active_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn record_payment(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;
}
