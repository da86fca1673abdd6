//! Signal service — binary entrypoint.
//! Boots the Axum HTTP server with the intake, store, and insight routes.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "signal_pulse=info,intake=info,insights=info,config=info,warn";

/// Compact logs by default, JSON when SIGNALS_LOG_JSON=1.
/// No-op if the runtime already installed a global subscriber.
fn init_tracing() {
    let json = std::env::var("SIGNALS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = signal_pulse::app()?;
    Ok(router.into())
}
