use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    ApproveRequest, BotInfo, CreateTaskRequest, ErrorBody, NewBotRequest, SearchRequest,
    SearchResponse, SignupRequest, TaskInfo, UserInfo,
};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client"),
        }
    }

    pub fn signup(&self, email: &str, name: Option<String>) -> Result<UserInfo, String> {
        self.post(
            "/api/auth/signup",
            &SignupRequest {
                email: email.to_string(),
                name,
            },
        )
    }

    pub fn list_bots(&self, user_id: &str) -> Result<Vec<BotInfo>, String> {
        self.get(&format!("/api/bots?user_id={}", user_id))
    }

    pub fn create_bot(&self, req: &NewBotRequest) -> Result<BotInfo, String> {
        self.post("/api/bots", req)
    }

    pub fn create_task(&self, req: &CreateTaskRequest) -> Result<TaskInfo, String> {
        self.post("/api/tasks", req)
    }

    pub fn list_tasks(&self, user_id: &str, bot_id: Option<&str>) -> Result<Vec<TaskInfo>, String> {
        let mut path = format!("/api/tasks?user_id={}", user_id);
        if let Some(bot_id) = bot_id {
            path.push_str(&format!("&bot_id={}", bot_id));
        }
        self.get(&path)
    }

    pub fn approve(&self, task_id: &str, index: i64) -> Result<TaskInfo, String> {
        self.post(
            "/api/tasks/approve",
            &ApproveRequest {
                task_id: task_id.to_string(),
                index,
            },
        )
    }

    pub fn search(&self, query: &str, retailer: Option<String>) -> Result<SearchResponse, String> {
        self.post(
            "/api/search",
            &SearchRequest {
                query: query.to_string(),
                retailer,
                limit: 5,
            },
        )
    }

    pub fn retailers(&self) -> Result<serde_json::Value, String> {
        self.get("/api/retailers")
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(url).send().map_err(|err| err.to_string())?;
        decode(resp)
    }

    fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| err.to_string())?;
        decode(resp)
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().map_err(|err| err.to_string());
    }
    let detail = resp
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.detail)
        .map(|value| value.to_string())
        .unwrap_or_default();
    Err(format!("http {}: {}", status.as_u16(), detail))
}
