// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod cooldown;
pub mod hasher;
pub mod insights;
pub mod intake;
pub mod metrics;
pub mod scoring;
pub mod signal;
pub mod stats;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::cooldown::CooldownTracker;
pub use crate::hasher::anon_hash;
pub use crate::insights::{generate_insights, InsightParams};
pub use crate::intake::{Intake, Submission, Verdict};
pub use crate::scoring::score;
pub use crate::signal::{NewSignal, Signal};
pub use crate::store::{InMemorySignalStore, SignalQuery, SignalStore};

use tracing::info;

/// Full in-process app: API routes plus `/metrics`.
///
/// Loads config via `AppConfig::load_default` (env + `config/signals.toml`).
pub fn app() -> anyhow::Result<axum::Router> {
    let config = AppConfig::load_default()?;
    info!(
        target: "config",
        cooldown_secs = config.cooldown.window_secs,
        recent_floor = config.thresholds.recent_min_confidence,
        insight_floor = config.thresholds.insight_min_confidence,
        "configuration loaded"
    );
    let metrics = crate::metrics::Metrics::init()?;
    let state = AppState::from_config(config);
    Ok(create_router(state).merge(metrics.router()))
}
