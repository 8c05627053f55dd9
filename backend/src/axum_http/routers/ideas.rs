use crate::{
    auth::AuthUser,
    axum_http::error_responses::error_response,
    axum_http::routers::entitlements::gating_config,
    config::config_model::{Groq as GroqConfig, Trial as TrialConfig},
    usecases::{
        entitlements::EntitlementUseCase,
        ideas::{CompletionGateway, IdeaUseCase, VideoIdeaDto},
    },
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use domain::repositories::{
    subscriptions::SubscriptionRepository, trials::TrialRepository,
};
use infra::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{subscriptions::SubscriptionPostgres, trials::TrialPostgres},
};
use llm::groq_client::GroqClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct GenerateIdeasRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateIdeasResponse {
    pub ideas: Vec<VideoIdeaDto>,
}

pub struct IdeasState<T, S, G>
where
    T: TrialRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: CompletionGateway + Send + Sync + 'static,
{
    entitlement_usecase: EntitlementUseCase<T, S>,
    idea_usecase: IdeaUseCase<G>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, trial: &TrialConfig, groq: &GroqConfig) -> Router {
    let trial_repository = TrialPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let entitlement_usecase = EntitlementUseCase::new(
        Arc::new(trial_repository),
        Arc::new(subscription_repository),
        gating_config(trial),
    );

    let groq_client = GroqClient::new(
        groq.api_key.clone(),
        groq.api_base.clone(),
        groq.model.clone(),
    );
    let idea_usecase = IdeaUseCase::new(Arc::new(groq_client));

    Router::new()
        .route(
            "/",
            post(generate_ideas::<TrialPostgres, SubscriptionPostgres, GroqClient>),
        )
        .with_state(Arc::new(IdeasState {
            entitlement_usecase,
            idea_usecase,
        }))
}

/// Gated feature: the entitlement verdict decides before any generation work
/// happens, the server-side twin of the client's trial route guard.
pub async fn generate_ideas<T, S, G>(
    State(state): State<Arc<IdeasState<T, S, G>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(generate_ideas_request): Json<GenerateIdeasRequest>,
) -> impl IntoResponse
where
    T: TrialRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
    G: CompletionGateway + Send + Sync,
{
    let entitlement = match state.entitlement_usecase.current_entitlement(user_id).await {
        Ok(view) => view,
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(error = %err, %user_id, "ideas: entitlement check failed");
            }
            return error_response(status, err.to_string());
        }
    };

    if entitlement.expired && !entitlement.is_pro {
        info!(%user_id, "ideas: request blocked, trial expired");
        return error_response(
            StatusCode::PAYMENT_REQUIRED,
            "Trial expired; upgrade required".to_string(),
        );
    }

    match state
        .idea_usecase
        .generate_video_ideas(
            &generate_ideas_request.title,
            &generate_ideas_request.description,
        )
        .await
    {
        Ok(ideas) => (StatusCode::OK, Json(GenerateIdeasResponse { ideas })).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(error = %err, %user_id, "ideas: generation failed");
            }

            error_response(status, err.to_string())
        }
    }
}
