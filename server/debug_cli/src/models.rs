use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub user_id: Option<String>,
    pub bot_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct NewBotRequest {
    pub user_id: String,
    pub name: String,
    pub retailers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub retailers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskRequest {
    pub user_id: String,
    pub bot_id: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ApproveRequest {
    pub task_id: String,
    pub index: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub retailer: Option<String>,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct CandidateInfo {
    pub retailer: String,
    pub title: String,
    pub price: f64,
    pub rating: f64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub status: String,
    pub prompt: String,
    #[serde(default)]
    pub candidates: Vec<CandidateInfo>,
    #[serde(default)]
    pub selection: Option<CandidateInfo>,
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<CandidateInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<Value>,
}
