//! HTTP surface of the relay
//!
//! - POST /transcribe - multipart field `audio` → `{ text }`
//! - POST /synthesize - `{ text }` → `audio/wav`
//! - GET /health - Health check
//! - everything else - browser client assets, when a static dir is configured

mod handlers;
mod routes;
mod state;

pub use handlers::{SynthesizeRequest, AUDIO_FIELD};
pub use routes::create_router;
pub use state::AppState;

use anyhow::{Context, Result};
use tracing::info;

/// Bind `addr` and serve the router until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
