use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{Extensions, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::cooldown::CooldownTracker;
use crate::intake::Intake;
use crate::stats::{self, StatsSnapshot};
use crate::store::{InMemorySignalStore, SignalStore};

#[derive(Clone)]
pub struct AppState {
    pub intake: Intake,
    pub store: Arc<dyn SignalStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// One cooldown tracker and an in-memory store per running instance.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn SignalStore> = Arc::new(InMemorySignalStore::new());
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn SignalStore>) -> Self {
        let cooldown = Arc::new(CooldownTracker::new(config.cooldown.window_secs));
        Self {
            intake: Intake::new(cooldown),
            store,
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/submit", post(submit))
        .route("/api/stats", get(get_stats))
        .route("/api/insights", get(get_insights))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct SubmitReq {
    #[serde(rename = "type", default)]
    signal_type: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(serde::Serialize)]
struct SubmitResp {
    status: &'static str,
    message: &'static str,
    confidence: f32,
    accepted_as_spam: bool,
}

#[derive(serde::Serialize)]
struct ErrorResp {
    status: &'static str,
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResp>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResp {
            status: "error",
            message: message.into(),
        }),
    )
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(body): Json<SubmitReq>,
) -> Result<Json<SubmitResp>, ApiError> {
    let signal_type = body.signal_type.trim();
    let context = body.context.trim();
    if signal_type.is_empty() || context.is_empty() {
        tracing::warn!(target: "intake", "rejected submission without type/context");
        return Err(bad_request("both 'type' and 'context' are required"));
    }

    let raw_address = client_address(&headers, &extensions);
    let sub = state
        .intake
        .submit(&raw_address, signal_type, context, body.message.as_deref());
    let verdict = sub.verdict;
    state.store.append(sub.candidate);

    let (status, message) = if verdict.accepted_as_spam {
        ("warning", "Signal received, but you're sending too fast. Please slow down.")
    } else {
        ("success", "Signal received")
    };
    Ok(Json(SubmitResp {
        status,
        message,
        confidence: verdict.confidence,
        accepted_as_spam: verdict.accepted_as_spam,
    }))
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(stats::build_stats(state.store.as_ref(), &state.config))
}

async fn get_insights(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(stats::insights(state.store.as_ref(), &state.config))
}

/// Raw client address: first X-Forwarded-For hop, then X-Real-IP, then the
/// socket peer, then "unknown".
pub fn client_address(headers: &HeaderMap, extensions: &Extensions) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').map(str::trim).find(|s| !s.is_empty()))
            .map(str::to_string)
    };
    if let Some(addr) = header("x-forwarded-for") {
        return addr;
    }
    if let Some(addr) = header("x-real-ip") {
        return addr;
    }
    if let Some(ConnectInfo(peer)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        return peer.ip().to_string();
    }
    "unknown".to_string()
}
