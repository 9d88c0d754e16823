use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    #[default]
    Manual,
    Auto,
}

/// Spending and approval guardrails a user puts on a bot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConstraints {
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub approval_mode: ApprovalMode,
}

/// User-owned shopping bot configuration. The first entry of `retailers`
/// is the one task creation searches against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bot {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub retailers: Vec<String>,
    #[serde(default)]
    pub constraints: BotConstraints,
    #[serde(default)]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBot {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub retailers: Vec<String>,
    #[serde(default)]
    pub constraints: BotConstraints,
    #[serde(default)]
    pub model: Option<String>,
}

/// The bot fields a PUT may touch. Anything not listed here is immutable
/// through the API.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BotUpdate {
    pub name: Option<String>,
    pub goals: Option<String>,
    pub retailers: Option<Vec<String>>,
    pub constraints: Option<BotConstraints>,
    pub model: Option<String>,
}
