use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::accounts::{Bot, BotUpdate, NewBot, User};
use crate::search::SUPPORTED_RETAILERS;
use crate::task::Task;

use super::error::ApiError;
use super::server::AppState;

pub async fn handle_root() -> Json<Value> {
    Json(json!({ "message": "ShopBot SaaS Backend Running" }))
}

pub async fn handle_health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let collections = state.store.collection_names()?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "collections": collections,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: Option<String>,
}

pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<User>, ApiError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("email required"));
    }
    Ok(Json(state.accounts.signup(email, req.name)?))
}

#[derive(Debug, Deserialize)]
pub struct BotsQuery {
    pub user_id: String,
}

pub async fn handle_list_bots(
    State(state): State<AppState>,
    Query(query): Query<BotsQuery>,
) -> Result<Json<Vec<Bot>>, ApiError> {
    Ok(Json(state.accounts.list_bots(&query.user_id)?))
}

pub async fn handle_create_bot(
    State(state): State<AppState>,
    Json(req): Json<NewBot>,
) -> Result<Json<Bot>, ApiError> {
    Ok(Json(state.accounts.create_bot(req)?))
}

pub async fn handle_update_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Json(req): Json<BotUpdate>,
) -> Result<Json<Bot>, ApiError> {
    Ok(Json(state.accounts.update_bot(&bot_id, req)?))
}

pub async fn handle_delete_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.accounts.delete_bot(&bot_id)?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn handle_retailers() -> Json<Value> {
    Json(json!({ "supported": SUPPORTED_RETAILERS }))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub retailer: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 {
    5
}

pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Value>, ApiError> {
    let results = state
        .search
        .search(&req.query, req.retailer.as_deref(), req.limit)?;
    Ok(Json(json!({ "results": results })))
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub user_id: String,
    pub bot_id: String,
    pub prompt: String,
}

pub async fn handle_create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .workflow
        .create_task(&req.user_id, &req.bot_id, &req.prompt)?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub user_id: String,
    pub bot_id: Option<String>,
}

pub async fn handle_list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .workflow
        .list_tasks(&query.user_id, query.bot_id.as_deref())?;
    Ok(Json(tasks))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub task_id: String,
    pub index: i64,
}

pub async fn handle_approve(
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.workflow.approve(&req.task_id, req.index)?))
}
