//! Image-generation gateway with ordered endpoint fallback.
//!
//! The same model is reachable under several inference URLs. Candidates are
//! tried one after another; a 404 or a transport failure moves on to the next
//! candidate, anything else is the final answer.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use super::{ProviderError, transport_error};
use crate::config::ReferentConfig;
use crate::fetch::error_chain;
use crate::{ReferentError, Result};

const DEFAULT_MIME: &str = "image/png";

/// One inference URL for a logical operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidate {
    /// URL with a `{model}` placeholder.
    pub url_template: String,
    /// Lower values are tried first.
    pub priority: u32,
}

impl EndpointCandidate {
    pub fn new(url_template: impl Into<String>, priority: u32) -> Self {
        Self { url_template: url_template.into(), priority }
    }

    /// Concrete URL for `model`.
    pub fn resolve(&self, model: &str) -> String {
        self.url_template.replace("{model}", model)
    }
}

/// Hugging Face inference URLs, in the order they are tried.
pub fn default_image_candidates() -> Vec<EndpointCandidate> {
    vec![
        EndpointCandidate::new("https://router.huggingface.co/hf-inference/models/{model}", 0),
        EndpointCandidate::new("https://router.huggingface.co/models/{model}", 1),
        EndpointCandidate::new("https://api-inference.huggingface.co/models/{model}", 2),
    ]
}

/// Binary image returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Media type without parameters, e.g. `image/png`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// `data:<mime>;base64,<payload>` form of the image.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    inputs: &'a str,
}

/// Generates images through the first reachable endpoint candidate.
#[derive(Debug, Clone)]
pub struct ImageGateway {
    client: Client,
    candidates: Vec<EndpointCandidate>,
    model: String,
    api_key: Option<String>,
}

impl ImageGateway {
    pub fn new(client: Client, config: &ReferentConfig) -> Self {
        let mut candidates = config.image_candidates.clone();
        candidates.sort_by_key(|c| c.priority);

        Self { client, candidates, model: config.image_model.clone(), api_key: config.image_api_key.clone() }
    }

    /// Generate an image for `prompt`.
    ///
    /// # Errors
    ///
    /// - [`ReferentError::MissingField`] for an empty prompt
    /// - [`ReferentError::ConfigurationMissing`] without an API key
    /// - [`ReferentError::AllEndpointsUnreachable`] when every candidate
    ///   answered 404 or could not be reached
    /// - [`ReferentError::Provider`] for the first final non-2xx answer or an
    ///   unusable image payload
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        if prompt.is_empty() {
            return Err(ReferentError::MissingField("prompt"));
        }
        let api_key = self.api_key.as_deref().ok_or(ReferentError::ConfigurationMissing("API_KEY_IMAGE"))?;

        let mut last_error: Option<String> = None;

        for candidate in &self.candidates {
            let url = candidate.resolve(&self.model);
            tracing::debug!(%url, priority = candidate.priority, "trying image endpoint");

            let response =
                match self.client.post(&url).bearer_auth(api_key).json(&ImageRequest { inputs: prompt }).send().await {
                    Ok(response) => response,
                    Err(err) => {
                        let message = error_chain(&err);
                        tracing::warn!(%url, error = %message, "image endpoint unreachable, trying next");
                        last_error = Some(format!("{}: {}", url, message));
                        continue;
                    }
                };

            if response.status() == StatusCode::NOT_FOUND {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(%url, "image endpoint returned 404, trying next");
                last_error = Some(format!("{}: HTTP 404 {}", url, body.trim()).trim_end().to_string());
                continue;
            }

            return read_image(response).await;
        }

        let last_error = last_error.unwrap_or_else(|| "no endpoint candidates configured".to_string());
        tracing::warn!(%last_error, "all image endpoints failed");
        Err(ReferentError::AllEndpointsUnreachable { last_error })
    }
}

async fn read_image(response: Response) -> Result<GeneratedImage> {
    let status = response.status().as_u16();

    if !response.status().is_success() {
        let body = response.text().await.map_err(transport_error)?;
        let err = ProviderError::from_status(status, &body);
        tracing::warn!(status, error = %err.raw_message, "image provider error");
        return Err(err.into());
    }

    let mime_type = match response.headers().get(reqwest::header::CONTENT_TYPE) {
        None => DEFAULT_MIME.to_string(),
        Some(value) => {
            let raw = value.to_str().unwrap_or_default();
            raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
        }
    };

    if !mime_type.starts_with("image/") {
        return Err(ProviderError::malformed(status, format!("expected an image, got '{}'", mime_type)).into());
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    if bytes.is_empty() {
        return Err(ProviderError::malformed(status, "empty image body").into());
    }

    Ok(GeneratedImage { mime_type, bytes: bytes.to_vec() })
}
