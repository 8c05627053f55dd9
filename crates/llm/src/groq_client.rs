use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// Chat-completions client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqErrorEnvelope {
    error: GroqErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GroqErrorDetails {
    message: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
}

impl GroqClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (groq_error_type, groq_error_code, groq_error_message) =
            match serde_json::from_str::<GroqErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.error.type_,
                    envelope.error.code,
                    envelope.error.message,
                ),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            groq_error_type = ?groq_error_type,
            groq_error_code = ?groq_error_code,
            groq_error_message = ?groq_error_message,
            context = %context,
            "groq api request failed"
        );

        anyhow::bail!(
            "Groq API request failed: {} (status {})",
            context,
            status
        );
    }

    /// Single-turn completion; returns the assistant message content.
    /// https://console.groq.com/docs/api-reference#chat
    pub async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": 0.7,
        });

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "chat completion").await?;

        let parsed: ChatCompletionResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("Groq completion returned no choices"))?;

        Ok(content)
    }
}
