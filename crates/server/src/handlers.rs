//! JSON handlers, one per route.
//!
//! Bodies are read as raw bytes and decoded leniently: a body that is not
//! valid JSON decodes to the request's default, so the operation reports the
//! missing field itself.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use referent_core::{
    ArticleRecord, ChatOperation, ErrorPresentation, OperationKind, ReferentError, Severity,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ParseRequest {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentRequest {
    pub content: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}

/// Error response: `{"error", "message", "severity"}` with the error's status.
#[derive(Debug)]
pub struct ApiError {
    error: ReferentError,
    operation: OperationKind,
}

impl ApiError {
    pub fn new(error: ReferentError, operation: OperationKind) -> Self {
        Self { error, operation }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let shown = ErrorPresentation::from_error(&self.error, self.operation);

        if shown.severity == Severity::Destructive {
            tracing::error!(operation = self.operation.as_str(), status = status.as_u16(), error = %self.error, "request failed");
        } else {
            tracing::info!(operation = self.operation.as_str(), status = status.as_u16(), error = %self.error, "request rejected");
        }

        let body = json!({
            "error": self.error.to_string(),
            "message": shown.message,
            "severity": shown.severity,
        });
        (status, Json(body)).into_response()
    }
}

fn decode<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

fn artifact(field: &str, text: String) -> Json<Value> {
    let mut map = Map::new();
    map.insert(field.to_string(), Value::String(text));
    Json(Value::Object(map))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn parse(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<ArticleRecord>, ApiError> {
    let request: ParseRequest = decode(&body);
    let url = request.url.unwrap_or_default();

    let record = state.referent.parse(&url).await.map_err(|e| ApiError::new(e, OperationKind::Parse))?;
    Ok(Json(record))
}

pub async fn translate(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let text = state
        .referent
        .translate(request.content.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::Translate))?;
    Ok(artifact(ChatOperation::TRANSLATE.output_field, text))
}

pub async fn summary(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let text = state
        .referent
        .summarize(request.content.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::Summarize))?;
    Ok(artifact(ChatOperation::SUMMARY.output_field, text))
}

pub async fn theses(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let text = state
        .referent
        .extract_theses(request.content.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::Theses))?;
    Ok(artifact(ChatOperation::THESES.output_field, text))
}

pub async fn telegram(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let text = state
        .referent
        .generate_post(
            request.content.as_deref().unwrap_or_default(),
            request.title.as_deref(),
            request.date.as_deref(),
        )
        .await
        .map_err(|e| ApiError::new(e, OperationKind::Post))?;
    Ok(artifact(ChatOperation::POST.output_field, text))
}

pub async fn image_prompt(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let text = state
        .referent
        .generate_image_prompt(request.content.as_deref().unwrap_or_default(), request.title.as_deref())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::ImagePrompt))?;
    Ok(artifact(ChatOperation::IMAGE_PROMPT.output_field, text))
}

pub async fn generate_image(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: PromptRequest = decode(&body);
    let image = state
        .referent
        .generate_image(request.prompt.as_deref().unwrap_or_default())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::ImageGeneration))?;
    Ok(Json(json!({ "image": image.to_data_url() })))
}

pub async fn illustration(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let request: ContentRequest = decode(&body);
    let illustration = state
        .referent
        .generate_illustration(request.content.as_deref().unwrap_or_default(), request.title.as_deref())
        .await
        .map_err(|e| ApiError::new(e, OperationKind::Illustration))?;
    Ok(Json(json!({ "prompt": illustration.prompt, "image": illustration.image.to_data_url() })))
}
