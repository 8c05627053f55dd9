use crate::{
    auth::AuthUser,
    axum_http::error_responses::error_response,
    config::config_model::Trial as TrialConfig,
    usecases::entitlements::{EntitlementUseCase, GatingConfig},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use domain::{
    repositories::{subscriptions::SubscriptionRepository, trials::TrialRepository},
    value_objects::entitlements::TrialWindow,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{subscriptions::SubscriptionPostgres, trials::TrialPostgres},
};
use std::sync::Arc;
use tracing::error;

pub fn gating_config(trial: &TrialConfig) -> GatingConfig {
    GatingConfig {
        window: TrialWindow {
            length: trial.window_length,
            unit: trial.window_unit,
        },
        disabled: trial.disabled,
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>, trial: &TrialConfig) -> Router {
    let trial_repository = TrialPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let entitlement_usecase = EntitlementUseCase::new(
        Arc::new(trial_repository),
        Arc::new(subscription_repository),
        gating_config(trial),
    );

    Router::new()
        .route(
            "/current",
            get(current_entitlement::<TrialPostgres, SubscriptionPostgres>),
        )
        .with_state(Arc::new(entitlement_usecase))
}

pub async fn current_entitlement<T, S>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<T, S>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    T: TrialRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match entitlement_usecase.current_entitlement(user_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(
                    error = %err,
                    %user_id,
                    "entitlements: evaluation failed"
                );
            }

            error_response(status, err.to_string())
        }
    }
}
