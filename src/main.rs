//! Quizgen · MCQ Generation Backend
//!
//! - Axum HTTP API: PDF upload or raw text in, multiple-choice questions out
//! - Optional OpenAI-compatible provider with a local rule-based fallback
//! - In-memory quiz store for generated batches
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   AI_PROVIDER       : "openai" / "llm" / "external" selects the external provider
//!   OPENAI_API_KEY    : enables the external client if present
//!   OPENAI_BASE_URL   : default "https://api.openai.com/v1"
//!   OPENAI_MODEL      : default "gpt-4o-mini"
//!   MCQ_CONFIG_PATH   : path to TOML config (prompts)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use quizgen_backend::routes::build_router;
use quizgen_backend::state::AppState;
use quizgen_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (config, generator, extractor, quiz store).
  let state = Arc::new(AppState::new());
  let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizgen_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quizgen_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "quizgen_backend", "Shutdown signal received");
}
