// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP surface of the gateway.
//!
//! - `POST /api/ai` — run the guarded chat pipeline.
//! - `POST /api/prompt` — authenticated passthrough to the prompt screen.
//! - `GET /health` — liveness.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::{AnswerGenerator, AuthzFilter, ChatService, GuardedChatService};
use crate::domain::authz::AuthzDecision;
use crate::domain::config::GatewayConfig;
use crate::domain::document::DocumentSummary;
use crate::domain::guard::{PromptScreen, PromptVerdict, RedactionVerdict, TextGuard};
use crate::domain::identity::CredentialValidator;
use crate::domain::llm::GenerationOptions;
use crate::domain::pipeline::{PipelineError, PipelineOutcome};
use crate::domain::query::GuardedQuery;
use crate::infrastructure::{
    HttpDocumentSource, OpenAiChatModel, PromptGuardClient, RelationCheckClient, ServiceClient,
    TextGuardClient, TokenCheckValidator,
};

pub struct AppState {
    pub chat: Arc<dyn ChatService>,
    pub validator: Arc<dyn CredentialValidator>,
    pub prompt_screen: Arc<dyn PromptScreen>,
}

/// Wire the concrete adapters and build the application state.
pub fn state_from_config(config: &GatewayConfig) -> Arc<AppState> {
    let platform = Arc::new(ServiceClient::new(&config.platform));

    let validator: Arc<dyn CredentialValidator> =
        Arc::new(TokenCheckValidator::new(platform.clone()));
    let prompt_screen: Arc<dyn PromptScreen> = Arc::new(PromptGuardClient::new(platform.clone()));
    let input_guard: Arc<dyn TextGuard> = Arc::new(TextGuardClient::for_input(platform.clone()));
    let output_guard: Arc<dyn TextGuard> = Arc::new(TextGuardClient::for_output(platform.clone()));
    let source = Arc::new(HttpDocumentSource::new(&config.retriever));
    let checker = Arc::new(RelationCheckClient::new(platform));
    let model = Arc::new(OpenAiChatModel::new(&config.llm));

    let options = GenerationOptions {
        max_tokens: Some(config.llm.max_tokens),
        temperature: Some(config.llm.temperature),
        stop_sequences: None,
    };

    let chat = GuardedChatService::new(
        validator.clone(),
        prompt_screen.clone(),
        input_guard,
        output_guard,
        source,
        AuthzFilter::new(checker),
        AnswerGenerator::new(model, options),
    );

    Arc::new(AppState {
        chat: Arc::new(chat),
        validator,
        prompt_screen,
    })
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ai", post(chat))
        .route("/api/prompt", post(screen_prompt))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    /// Whether to apply per-document authorization filtering.
    pub authz: bool,

    pub user_prompt: String,

    #[serde(default = "default_true")]
    pub prompt_guard: bool,

    #[serde(default = "default_true")]
    pub content_guard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Completed,
    Halted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    pub outcome: OutcomeKind,

    /// The generated reply, or the fixed halt message.
    pub reply: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_guard: Option<PromptVerdict>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_guard: Option<RedactionVerdict>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_guard: Option<RedactionVerdict>,

    #[serde(default)]
    pub authz_responses: Vec<AuthzDecision>,

    #[serde(default)]
    pub documents: Vec<DocumentSummary>,
}

impl From<PipelineOutcome> for ChatResponseBody {
    fn from(outcome: PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Completed(result) => Self {
                outcome: OutcomeKind::Completed,
                reply: result.reply,
                prompt_guard: result.prompt_guard,
                input_guard: result.input_guard,
                output_guard: result.output_guard,
                authz_responses: result.authz_decisions,
                documents: result.documents,
            },
            PipelineOutcome::Halted {
                message,
                prompt_guard,
                input_guard,
            } => Self {
                outcome: OutcomeKind::Halted,
                reply: message,
                prompt_guard,
                input_guard,
                output_guard: None,
                authz_responses: Vec::new(),
                documents: Vec::new(),
            },
        }
    }
}

struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            PipelineError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            e => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.user_message() })),
            )
                .into_response(),
        }
    }
}

/// Extract the bearer token, or an empty string (which fails validation
/// downstream without issuing any verification call).
fn bearer_token(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.split_once(' ')?;
            scheme
                .eq_ignore_ascii_case("bearer")
                .then(|| token.to_string())
        })
        .unwrap_or_default()
}

async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let token = bearer_token(&headers);
    let query = GuardedQuery {
        user_prompt: body.user_prompt,
        enable_authz: body.authz,
        enable_prompt_guard: body.prompt_guard,
        enable_content_guard: body.content_guard,
    };

    let outcome = state.chat.run(&token, query).await?;
    Ok(Json(ChatResponseBody::from(outcome)))
}

async fn screen_prompt(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let token = bearer_token(&headers);
    if state.validator.validate(&token).await.is_err() {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    match state.prompt_screen.screen_raw(&body).await {
        Ok(raw) if raw.success => (StatusCode::OK, Json(raw.body)).into_response(),
        Ok(raw) => (StatusCode::BAD_REQUEST, Json(raw.body)).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
