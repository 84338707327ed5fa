//! REST endpoints for the inbox: listing, agent queries, batch enrichment.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::agent::QueryAgent;
use crate::config::AppConfig;
use crate::error::{PromptError, QueryError, Result};
use crate::llm::create_provider;
use crate::pipeline::enrich::BatchEnricher;
use crate::pipeline::rules::RulesEngine;
use crate::store::{MessageStore, TemplateStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<RwLock<MessageStore>>,
    pub agent: Arc<QueryAgent>,
    pub enricher: Arc<BatchEnricher>,
}

impl AppState {
    /// Load the inbox and templates and wire up the agent and enricher.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let messages = match &config.messages_path {
            Some(path) => MessageStore::load(path)?,
            None => MessageStore::bundled()?,
        };
        let templates = match &config.templates_path {
            Some(path) => TemplateStore::load(path)?,
            None => TemplateStore::builtin(),
        };
        let llm = create_provider(&config.llm)?;

        let messages = Arc::new(RwLock::new(messages));
        let agent = QueryAgent::new(
            Arc::clone(&messages),
            Arc::new(templates),
            llm,
            config.identity.clone(),
        )
        .with_max_tokens(config.llm.max_tokens);
        let enricher = BatchEnricher::new(RulesEngine::default_rules(), config.batch_delay);

        Ok(Self {
            messages,
            agent: Arc::new(agent),
            enricher: Arc::new(enricher),
        })
    }
}

/// Build the Axum router with all inbox routes.
pub fn inbox_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/emails", get(list_emails))
        .route("/api/agent-query", post(agent_query))
        .route("/api/batch-process", post(batch_process))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inbox-agent"
    }))
}

// ── Inbox ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    filter: Option<String>,
}

/// GET /api/emails
///
/// Returns the current inbox, optionally narrowed by `?filter=`.
async fn list_emails(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let store = state.messages.read().await;
    let emails = match params.filter.as_deref() {
        Some(q) => store.filter(q),
        None => store.snapshot(),
    };
    Json(emails)
}

// ── Agent query ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentQueryRequest {
    #[serde(default)]
    email_id: Option<serde_json::Value>,
    #[serde(default)]
    user_instruction: Option<String>,
}

/// Accept the email id as either a JSON number or a string.
///
/// Zero and the empty string count as missing.
fn email_id_string(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Number(n) => number_id(n),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Render a numeric id in plain decimal. Fractions are truncated; floats
/// outside the `i64` range are written out in full so the lookup misses.
fn number_id(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    if f == 0.0 {
        return None;
    }
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some((f.trunc() as i64).to_string())
    } else {
        Some(format!("{f:.0}"))
    }
}

/// POST /api/agent-query
async fn agent_query(
    State(state): State<AppState>,
    Json(body): Json<AgentQueryRequest>,
) -> impl IntoResponse {
    let email_id = email_id_string(body.email_id.as_ref());
    let instruction = body.user_instruction.filter(|s| !s.is_empty());

    let (Some(email_id), Some(instruction)) = (email_id, instruction) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing emailId or userInstruction"})),
        );
    };

    match state.agent.query(&email_id, &instruction).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({"response": response})),
        ),
        Err(QueryError::Prompt(e @ PromptError::NotFound { .. })) => {
            warn!(email_id = %email_id, "Agent query for unknown email");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
        Err(e) => {
            error!(email_id = %email_id, error = %e, "Error processing agent query");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}

// ── Batch enrichment ────────────────────────────────────────────────────

/// POST /api/batch-process
///
/// Runs the keyword enrichment over the whole inbox and returns it.
async fn batch_process(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.messages.read().await.snapshot();
    let enriched = state.enricher.enrich_all(snapshot).await;

    let data = {
        let mut store = state.messages.write().await;
        let applied = store.apply_enrichment(enriched);
        info!(applied, "Batch enrichment written back to inbox");
        store.snapshot()
    };

    Json(serde_json::json!({
        "message": "Ingestion successful (Simulated)",
        "data": data,
    }))
}
