//! Recon Chat API — REST front end for the Recon chatbot.
//!
//! Serves `POST /chat` and `GET /health` for the Recon web UI. Starts even
//! when the agent cannot be built, so `/health` can report the failure.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use rc_agent::ChatbotConfig;
use rc_chat_api::config::ApiConfig;
use rc_chat_api::routes::build_router;
use rc_chat_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rc-chat-api starting");

    let config = ApiConfig::from_env();
    let chatbot = ChatbotConfig::from_env();
    let state = AppState::from_config(&chatbot);
    if state.agent.is_none() {
        tracing::warn!("serving without an agent, /chat will return 500");
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
