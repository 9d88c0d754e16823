pub mod service;
pub mod types;

pub use service::{AccountError, AccountService, BOT_COLLECTION, USER_COLLECTION};
pub use types::{ApprovalMode, Bot, BotConstraints, BotUpdate, NewBot, Plan, User};
