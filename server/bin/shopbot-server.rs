use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use shopbot_server::api::server::{ApiServer, AppState};
use shopbot_server::{MemoryStore, ServerConfig, StubSearch};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(StubSearch::new()));
    let server = ApiServer::new(config, state);

    if let Err(err) = server.start().await {
        tracing::error!("server error: {}", err);
        std::process::exit(1);
    }
}
