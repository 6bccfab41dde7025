//! Single-endpoint chat-completions gateway.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::operation::{ChatOperation, prepare_content};
use super::{ProviderError, transport_error};
use crate::config::ReferentConfig;
use crate::{ReferentError, Result};

/// Application name sent as `X-Title`.
pub const APP_TITLE: &str = "Referent App";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Sends one [`ChatOperation`] to an OpenRouter-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    app_url: String,
}

impl ChatGateway {
    pub fn new(client: Client, config: &ReferentConfig) -> Self {
        Self {
            client,
            endpoint: config.chat_endpoint.clone(),
            model: config.chat_model.clone(),
            api_key: config.chat_api_key.clone(),
            app_url: config.app_url.clone(),
        }
    }

    /// Run `op` on `content`.
    ///
    /// Input is validated before the credential check, so a short text is
    /// reported as such even when no key is configured. Nothing is sent when
    /// either check fails.
    pub async fn complete(
        &self, op: &ChatOperation, content: &str, title: Option<&str>, date: Option<&str>,
    ) -> Result<String> {
        let prepared = prepare_content(content, op.content_budget)?;
        let api_key = self.api_key.as_deref().ok_or(ReferentError::ConfigurationMissing("OPENROUTER_API_KEY"))?;

        let user_message = op.user_message(&prepared, title, date);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: op.system_prompt },
                ChatMessage { role: "user", content: &user_message },
            ],
            temperature: op.temperature,
            max_tokens: op.max_tokens,
        };

        tracing::debug!(
            operation = op.kind.as_str(),
            content_chars = prepared.chars().count(),
            model = %self.model,
            "sending chat completion"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        if !(200..300).contains(&status) {
            let err = ProviderError::from_status(status, &body);
            tracing::warn!(operation = op.kind.as_str(), status, error = %err.raw_message, "chat provider error");
            return Err(err.into());
        }

        extract_completion(&body).map_err(|detail| {
            tracing::warn!(operation = op.kind.as_str(), %detail, "unusable chat response");
            ProviderError::malformed(status, detail).into()
        })
    }
}

/// Text of the first choice, rejected when absent or blank.
fn extract_completion(body: &str) -> std::result::Result<String, String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {}", e))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| "response contains no completion text".to_string())
}
