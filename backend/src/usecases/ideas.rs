use std::sync::Arc;

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use llm::groq_client::GroqClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CompletionGateway: Send + Sync {
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> AnyResult<String>;
}

#[async_trait]
impl CompletionGateway for GroqClient {
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> AnyResult<String> {
        self.chat_completion(system_prompt, user_prompt).await
    }
}

#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("idea generation failed")]
    GenerationFailed(anyhow::Error),
}

impl IdeaError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            IdeaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            IdeaError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoIdeaDto {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

const IDEAS_SYSTEM_PROMPT: &str = "You generate YouTube video ideas. \
Answer with a JSON array only, no prose. Each element has the keys \
\"title\", \"description\" and \"tags\" (an array of short strings). \
Produce exactly 5 ideas related to the given video.";

pub struct IdeaUseCase<G>
where
    G: CompletionGateway + Send + Sync + 'static,
{
    completion_client: Arc<G>,
}

impl<G> IdeaUseCase<G>
where
    G: CompletionGateway + Send + Sync + 'static,
{
    pub fn new(completion_client: Arc<G>) -> Self {
        Self { completion_client }
    }

    pub async fn generate_video_ideas(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Vec<VideoIdeaDto>, IdeaError> {
        let title = title.trim();
        if title.is_empty() {
            let err = IdeaError::InvalidInput("video title is required".to_string());
            warn!(
                status = err.status_code().as_u16(),
                "ideas: generation requested without a title"
            );
            return Err(err);
        }

        info!(title, "ideas: generating video ideas");

        let user_prompt = format!(
            "Video title: {}\nVideo description: {}",
            title,
            description.trim()
        );

        let content = self
            .completion_client
            .chat_completion(IDEAS_SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|err| {
                error!(title, error = ?err, "ideas: completion request failed");
                IdeaError::GenerationFailed(err)
            })?;

        let ideas = parse_ideas(&content)?;
        info!(title, idea_count = ideas.len(), "ideas: generation finished");

        Ok(ideas)
    }
}

/// Models wrap the array in markdown fences often enough that stripping them
/// is part of the contract.
fn parse_ideas(content: &str) -> Result<Vec<VideoIdeaDto>, IdeaError> {
    let stripped = strip_code_fences(content);

    serde_json::from_str::<Vec<VideoIdeaDto>>(stripped).map_err(|err| {
        let content_prefix: String = content.chars().take(120).collect();
        warn!(
            parse_error = %err,
            content_prefix = %content_prefix,
            "ideas: model output was not a parseable idea array"
        );
        IdeaError::GenerationFailed(anyhow!("model returned unparseable ideas"))
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
