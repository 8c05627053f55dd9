use crate::{
    auth::AuthUser,
    axum_http::error_responses::error_response,
    config::config_model::PayPal as PayPalConfig,
    usecases::subscriptions::{PayPalGateway, SubscriptionUseCase},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use domain::{
    repositories::subscriptions::SubscriptionRepository,
    value_objects::subscriptions::VerifyOrderRequest,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad, repositories::subscriptions::SubscriptionPostgres,
};
use payments::paypal_client::PayPalClient;
use std::sync::Arc;
use tracing::error;

pub fn routes(db_pool: Arc<PgPoolSquad>, paypal: &PayPalConfig) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let paypal_client = PayPalClient::new(
        paypal.client_id.clone(),
        paypal.secret.clone(),
        paypal.api_base.clone(),
    );
    let subscription_usecase =
        SubscriptionUseCase::new(Arc::new(subscription_repository), Arc::new(paypal_client));

    Router::new()
        .route(
            "/plans",
            get(list_plans::<SubscriptionPostgres, PayPalClient>),
        )
        .route(
            "/current",
            get(current_subscription::<SubscriptionPostgres, PayPalClient>),
        )
        .route(
            "/verify",
            post(verify_order::<SubscriptionPostgres, PayPalClient>),
        )
        .with_state(Arc::new(subscription_usecase))
}

pub async fn list_plans<S, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync,
    G: PayPalGateway + Send + Sync,
{
    (StatusCode::OK, Json(subscription_usecase.list_plans())).into_response()
}

pub async fn current_subscription<S, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync,
    G: PayPalGateway + Send + Sync,
{
    match subscription_usecase.current_subscription(user_id).await {
        // None is a normal answer (free or trialing user), not an error.
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(
                    error = %err,
                    %user_id,
                    "subscriptions: failed to load current subscription"
                );
            }

            error_response(status, err.to_string())
        }
    }
}

pub async fn verify_order<S, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(verify_order_request): Json<VerifyOrderRequest>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync,
    G: PayPalGateway + Send + Sync,
{
    match subscription_usecase
        .verify_and_record(user_id, verify_order_request)
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(
                    error = %err,
                    %user_id,
                    "subscriptions: order verification failed"
                );
            }

            error_response(status, err.to_string())
        }
    }
}
