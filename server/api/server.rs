use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::accounts::AccountService;
use crate::config::ServerConfig;
use crate::search::CandidateSearch;
use crate::store::DocumentStore;
use crate::task::TaskWorkflow;

use super::acp::{handle_acp_actions, handle_acp_invoke};
use super::handlers::{
    handle_approve, handle_create_bot, handle_create_task, handle_delete_bot, handle_health,
    handle_list_bots, handle_list_tasks, handle_retailers, handle_root, handle_search,
    handle_signup, handle_update_bot,
};

/// Shared capabilities behind every handler. The store and search seams
/// are injected so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub search: Arc<dyn CandidateSearch>,
    pub workflow: Arc<TaskWorkflow>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, search: Arc<dyn CandidateSearch>) -> Self {
        let workflow = Arc::new(TaskWorkflow::new(store.clone(), search.clone()));
        let accounts = Arc::new(AccountService::new(store.clone()));
        Self {
            store,
            search,
            workflow,
            accounts,
        }
    }
}

pub struct ApiServer {
    pub config: ServerConfig,
    pub state: AppState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        // Frontend origin is unknown in the MVP, so CORS stays wide open.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handle_root))
            .route("/health", get(handle_health))
            .route("/api/auth/signup", post(handle_signup))
            .route("/api/bots", get(handle_list_bots).post(handle_create_bot))
            .route(
                "/api/bots/:bot_id",
                put(handle_update_bot).delete(handle_delete_bot),
            )
            .route("/api/retailers", get(handle_retailers))
            .route("/api/search", post(handle_search))
            .route("/api/tasks", get(handle_list_tasks).post(handle_create_task))
            .route("/api/tasks/approve", post(handle_approve))
            .route("/api/acp/actions", get(handle_acp_actions))
            .route("/api/acp/invoke", post(handle_acp_invoke))
            .layer(cors)
            .with_state(self.state.clone())
    }

    pub async fn start(&self) -> Result<(), String> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|err| format!("invalid listen address: {}", err))?;
        info!(%addr, "shopbot api listening");
        axum::Server::bind(&addr)
            .serve(self.router().into_make_service())
            .await
            .map_err(|err| err.to_string())
    }
}
