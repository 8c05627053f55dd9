use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::Utc;
use domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::subscription_statuses::SubscriptionStatus,
        subscriptions::{PlanDto, SubscriptionDto, VerifyOrderRequest},
    },
};
use payments::paypal_client::{PayPalClient, PayPalOrder};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PayPalGateway: Send + Sync {
    async fn get_order(&self, order_id: &str) -> AnyResult<PayPalOrder>;
}

#[async_trait]
impl PayPalGateway for PayPalClient {
    async fn get_order(&self, order_id: &str) -> AnyResult<PayPalOrder> {
        self.get_order(order_id).await
    }
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("order is not completed")]
    OrderNotCompleted,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::OrderNotCompleted => StatusCode::PAYMENT_REQUIRED,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PayPalGateway + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    paypal_client: Arc<G>,
}

impl<S, G> SubscriptionUseCase<S, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PayPalGateway + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, paypal_client: Arc<G>) -> Self {
        Self {
            subscription_repo,
            paypal_client,
        }
    }

    pub fn list_plans(&self) -> Vec<PlanDto> {
        let plans = PlanDto::catalog();
        info!(plan_count = plans.len(), "subscriptions: plans listed");
        plans
    }

    pub async fn current_subscription(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<SubscriptionDto>> {
        if user_id.is_nil() {
            return Err(SubscriptionError::InvalidInput(
                "user id is required".to_string(),
            ));
        }

        let subscription = self
            .subscription_repo
            .find_latest_active_by_user(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load current subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        Ok(subscription.map(SubscriptionDto::from))
    }

    /// Confirms a checkout order with PayPal and, only on a completed order,
    /// appends an active subscription row. Verification failure persists
    /// nothing.
    pub async fn verify_and_record(
        &self,
        user_id: Uuid,
        request: VerifyOrderRequest,
    ) -> UseCaseResult<SubscriptionDto> {
        if user_id.is_nil() {
            return Err(SubscriptionError::InvalidInput(
                "user id is required".to_string(),
            ));
        }

        let order_id = request.order_id.trim();
        if order_id.is_empty() {
            let err = SubscriptionError::InvalidInput("order id is required".to_string());
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "subscriptions: verify requested without order id"
            );
            return Err(err);
        }

        info!(
            %user_id,
            order_id,
            plan = %request.plan,
            "subscriptions: verifying paypal order"
        );

        let order = self.paypal_client.get_order(order_id).await.map_err(|err| {
            error!(
                %user_id,
                order_id,
                error = ?err,
                "subscriptions: paypal order lookup failed"
            );
            SubscriptionError::Internal(err)
        })?;

        if !order.is_completed() {
            let err = SubscriptionError::OrderNotCompleted;
            warn!(
                %user_id,
                order_id,
                order_status = ?order.status,
                status = err.status_code().as_u16(),
                "subscriptions: order is not completed, nothing recorded"
            );
            return Err(err);
        }

        let subscription = self
            .subscription_repo
            .record_payment(InsertSubscriptionEntity {
                user_id,
                plan: request.plan.to_string(),
                status: SubscriptionStatus::Active.to_string(),
                paypal_order_id: order_id.to_string(),
                paid_at: Utc::now(),
                receipt_url: order.receipt_url(),
            })
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    order_id,
                    db_error = ?err,
                    "subscriptions: failed to record payment"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            plan = %subscription.plan,
            "subscriptions: payment recorded"
        );

        Ok(SubscriptionDto::from(subscription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::entitlements::{EntitlementUseCase, GatingConfig};
    use chrono::Duration;
    use domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{
            subscriptions::MockSubscriptionRepository, trials::MockTrialRepository,
        },
        value_objects::{entitlements::TrialWindow, enums::plans::Plan},
    };
    use std::sync::Mutex;

    fn completed_order() -> PayPalOrder {
        serde_json::from_value(serde_json::json!({
            "id": "ORDER123",
            "status": "COMPLETED",
            "links": [
                { "href": "https://api-m.sandbox.paypal.com/v2/checkout/orders/ORDER123", "rel": "self" }
            ]
        }))
        .unwrap()
    }

    fn pending_order() -> PayPalOrder {
        serde_json::from_value(serde_json::json!({
            "id": "ORDER123",
            "status": "APPROVED",
            "links": []
        }))
        .unwrap()
    }

    fn entity_from_insert(insert: &InsertSubscriptionEntity) -> SubscriptionEntity {
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            plan: insert.plan.clone(),
            status: insert.status.clone(),
            paypal_order_id: insert.paypal_order_id.clone(),
            paid_at: insert.paid_at,
            receipt_url: insert.receipt_url.clone(),
            created_at: insert.paid_at,
        }
    }

    #[tokio::test]
    async fn completed_order_records_an_active_subscription() {
        let user_id = Uuid::new_v4();

        let mut gateway = MockPayPalGateway::new();
        gateway
            .expect_get_order()
            .withf(|order_id| order_id == "ORDER123")
            .returning(|_| Box::pin(async { Ok(completed_order()) }));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_record_payment()
            .withf(move |insert| {
                insert.user_id == user_id
                    && insert.plan == "yearly"
                    && insert.status == "active"
                    && insert.paypal_order_id == "ORDER123"
                    && insert.receipt_url.is_some()
            })
            .returning(|insert| {
                let entity = entity_from_insert(&insert);
                Box::pin(async move { Ok(entity) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(gateway));

        let dto = usecase
            .verify_and_record(
                user_id,
                VerifyOrderRequest {
                    order_id: "ORDER123".to_string(),
                    plan: Plan::Yearly,
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.plan, Plan::Yearly);
        assert_eq!(
            dto.receipt_url.as_deref(),
            Some("https://api-m.sandbox.paypal.com/v2/checkout/orders/ORDER123")
        );
    }

    #[tokio::test]
    async fn non_completed_order_persists_nothing() {
        let user_id = Uuid::new_v4();

        let mut gateway = MockPayPalGateway::new();
        gateway
            .expect_get_order()
            .returning(|_| Box::pin(async { Ok(pending_order()) }));

        // No record_payment expectation: an insert would panic the mock.
        let subscription_repo = MockSubscriptionRepository::new();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(gateway));

        let err = usecase
            .verify_and_record(
                user_id,
                VerifyOrderRequest {
                    order_id: "ORDER123".to_string(),
                    plan: Plan::Monthly,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::OrderNotCompleted));
        assert_eq!(err.status_code().as_u16(), 402);
    }

    #[tokio::test]
    async fn blank_order_id_is_rejected_before_the_gateway_call() {
        let usecase = SubscriptionUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPayPalGateway::new()),
        );

        let err = usecase
            .verify_and_record(
                Uuid::new_v4(),
                VerifyOrderRequest {
                    order_id: "   ".to_string(),
                    plan: Plan::Monthly,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn plan_catalog_matches_the_pricing_page() {
        let usecase = SubscriptionUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPayPalGateway::new()),
        );

        let plans = usecase.list_plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].plan, Plan::Monthly);
        assert_eq!(plans[0].price_minor, 500);
        assert_eq!(plans[1].plan, Plan::Yearly);
        assert_eq!(plans[1].price_minor, 3900);
    }

    #[tokio::test]
    async fn recorded_payment_immediately_grants_pro_entitlement() {
        let user_id = Uuid::new_v4();
        let recorded: Arc<Mutex<Option<SubscriptionEntity>>> = Arc::new(Mutex::new(None));

        let mut gateway = MockPayPalGateway::new();
        gateway
            .expect_get_order()
            .returning(|_| Box::pin(async { Ok(completed_order()) }));

        let mut subscription_repo = MockSubscriptionRepository::new();
        let write_slot = Arc::clone(&recorded);
        subscription_repo
            .expect_record_payment()
            .returning(move |insert| {
                let entity = entity_from_insert(&insert);
                *write_slot.lock().unwrap() = Some(entity.clone());
                Box::pin(async move { Ok(entity) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(gateway));
        usecase
            .verify_and_record(
                user_id,
                VerifyOrderRequest {
                    order_id: "ORDER123".to_string(),
                    plan: Plan::Yearly,
                },
            )
            .await
            .unwrap();

        // An entitlement check against the store now holding that row is pro,
        // even though the user's trial expired long ago.
        let mut entitlement_subscription_repo = MockSubscriptionRepository::new();
        let read_slot = Arc::clone(&recorded);
        entitlement_subscription_repo
            .expect_find_latest_active_by_user()
            .returning(move |_| {
                let entity = read_slot.lock().unwrap().clone();
                Box::pin(async move { Ok(entity) })
            });

        let mut trial_repo = MockTrialRepository::new();
        let expired_start = Utc::now() - Duration::days(30);
        trial_repo
            .expect_find_trial_start()
            .returning(move |_| Box::pin(async move { Ok(Some(expired_start)) }));

        let entitlement_usecase = EntitlementUseCase::new(
            Arc::new(trial_repo),
            Arc::new(entitlement_subscription_repo),
            GatingConfig {
                window: TrialWindow::standard(),
                disabled: false,
            },
        );

        let view = entitlement_usecase.current_entitlement(user_id).await.unwrap();
        assert!(view.is_pro);
        assert!(!view.expired);
    }
}
