//! HTTP backend for the portfolio: AI chat, project ideas and the contact form.

mod config;
mod error;
mod gemini;
mod routes;

use std::sync::Arc;

use anyhow::Result;

use config::ApiConfig;
use gemini::GeminiClient;
use routes::AppState;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ApiConfig::from_env()?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; chat and idea endpoints will fail");
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
    }

    let gemini = GeminiClient::new(&config.gemini_api_base, &config.gemini_model)?;
    let port = config.port;
    let app = routes::router(Arc::new(AppState { config, gemini }));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "portfolio api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
