//! Gateways to the external chat-completion and image-generation providers.
//!
//! Both gateways share one [`reqwest::Client`] and report failures as
//! [`ProviderError`], classified by HTTP status into a [`ProviderErrorKind`].

pub mod chat;
pub mod image;
pub mod operation;

pub use chat::ChatGateway;
pub use image::{EndpointCandidate, GeneratedImage, ImageGateway, default_image_candidates};
pub use operation::{ChatOperation, OperationKind, prepare_content};

use thiserror::Error;

use crate::ReferentError;
use crate::fetch::classify_transport;

/// Classified provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// 401: the API key was rejected.
    InvalidCredentials,
    /// 404: the model or endpoint does not exist.
    ModelUnavailable,
    /// 429: too many requests.
    RateLimited,
    /// 503: the model is warming up. Reported, never retried.
    ModelLoading,
    /// 500: provider side failure.
    ServerError,
    /// Any other non-2xx status.
    Upstream,
    /// 2xx with a body that cannot be used.
    MalformedResponse,
}

impl ProviderErrorKind {
    /// Kind for a non-2xx status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ProviderErrorKind::InvalidCredentials,
            404 => ProviderErrorKind::ModelUnavailable,
            429 => ProviderErrorKind::RateLimited,
            503 => ProviderErrorKind::ModelLoading,
            500 => ProviderErrorKind::ServerError,
            _ => ProviderErrorKind::Upstream,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProviderErrorKind::InvalidCredentials => "invalid API key",
            ProviderErrorKind::ModelUnavailable => "model unavailable",
            ProviderErrorKind::RateLimited => "rate limit exceeded",
            ProviderErrorKind::ModelLoading => "model is loading",
            ProviderErrorKind::ServerError => "provider server error",
            ProviderErrorKind::Upstream => "provider error",
            ProviderErrorKind::MalformedResponse => "malformed provider response",
        }
    }
}

/// A failed provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} (HTTP {http_status}): {raw_message}", kind.label())]
pub struct ProviderError {
    /// Status returned by the provider.
    pub http_status: u16,
    pub kind: ProviderErrorKind,
    /// Provider supplied error text, verbatim.
    pub raw_message: String,
}

impl ProviderError {
    pub fn new(http_status: u16, kind: ProviderErrorKind, raw_message: impl Into<String>) -> Self {
        Self { http_status, kind, raw_message: raw_message.into() }
    }

    /// Error for a non-2xx provider response.
    pub fn from_status(http_status: u16, body: &str) -> Self {
        Self::new(http_status, ProviderErrorKind::from_status(http_status), provider_message(body, http_status))
    }

    /// Error for a 2xx response with an unusable payload.
    pub fn malformed(http_status: u16, detail: impl Into<String>) -> Self {
        Self::new(http_status, ProviderErrorKind::MalformedResponse, detail)
    }
}

/// Pull the human readable text out of a provider error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ".."}`; anything else is returned as the trimmed body.
pub fn provider_message(body: &str, http_status: u16) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|value| {
        value
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .or_else(|| value.get("error").and_then(|e| e.as_str()))
            .or_else(|| value.get("message").and_then(|m| m.as_str()))
            .map(str::to_string)
    });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("HTTP {}", http_status),
    }
}

/// Transport failure talking to a provider.
pub(crate) fn transport_error(err: reqwest::Error) -> ReferentError {
    let (kind, message) = classify_transport(err);
    ReferentError::Transport { kind, message }
}
