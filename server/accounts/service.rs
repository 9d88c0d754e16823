use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::store::{DocumentStore, Filter, StoreError, Update};

use super::types::{Bot, BotUpdate, NewBot, Plan, User};

pub const USER_COLLECTION: &str = "user";
pub const BOT_COLLECTION: &str = "bot";

const BOT_PAGE_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("bot not found")]
    BotNotFound,
    #[error("invalid bot id: {0}")]
    InvalidBotId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored document did not decode: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Plain create-or-fetch plumbing for users and bots. No workflow rules
/// live here; uniqueness of the signup email is the only invariant.
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Upsert by email: an existing user is returned untouched, so signup
    /// doubles as login in the MVP.
    pub fn signup(&self, email: &str, name: Option<String>) -> Result<User, AccountError> {
        let filter = Filter::new().field("email", email);
        if let Some(doc) = self.store.find_one(USER_COLLECTION, &filter)? {
            return Ok(serde_json::from_value(doc)?);
        }

        let mut user = User {
            id: String::new(),
            email: email.to_string(),
            name,
            plan: Plan::Free,
            is_active: true,
            created_at: Utc::now(),
        };
        let doc = serde_json::to_value(&user)?;
        user.id = self.store.create(USER_COLLECTION, doc)?;
        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    pub fn list_bots(&self, user_id: &str) -> Result<Vec<Bot>, AccountError> {
        let filter = Filter::new().field("user_id", user_id);
        let docs = self.store.find_many(BOT_COLLECTION, &filter, BOT_PAGE_LIMIT)?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(AccountError::from))
            .collect()
    }

    pub fn create_bot(&self, new: NewBot) -> Result<Bot, AccountError> {
        let mut bot = Bot {
            id: String::new(),
            user_id: new.user_id,
            name: new.name,
            goals: new.goals,
            retailers: new.retailers,
            constraints: new.constraints,
            model: new.model,
            created_at: Utc::now(),
            updated_at: None,
        };
        let doc = serde_json::to_value(&bot)?;
        bot.id = self.store.create(BOT_COLLECTION, doc)?;
        info!(bot_id = %bot.id, "bot created");
        Ok(bot)
    }

    pub fn update_bot(&self, bot_id: &str, update: BotUpdate) -> Result<Bot, AccountError> {
        if Uuid::parse_str(bot_id).is_err() {
            return Err(AccountError::InvalidBotId(bot_id.to_string()));
        }
        let store_update = to_store_update(&update)?;
        let doc = self
            .store
            .find_one_and_update(BOT_COLLECTION, &Filter::by_id(bot_id), &store_update)?
            .ok_or(AccountError::BotNotFound)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_bot(&self, bot_id: &str) -> Result<(), AccountError> {
        if Uuid::parse_str(bot_id).is_err() {
            return Err(AccountError::InvalidBotId(bot_id.to_string()));
        }
        self.store.delete_one(BOT_COLLECTION, &Filter::by_id(bot_id))?;
        Ok(())
    }
}

fn to_store_update(update: &BotUpdate) -> Result<Update, serde_json::Error> {
    let mut out = Update::new();
    if let Some(name) = &update.name {
        out = out.set("name", name.clone());
    }
    if let Some(goals) = &update.goals {
        out = out.set("goals", goals.clone());
    }
    if let Some(retailers) = &update.retailers {
        out = out.set("retailers", serde_json::to_value(retailers)?);
    }
    if let Some(constraints) = &update.constraints {
        out = out.set("constraints", serde_json::to_value(constraints)?);
    }
    if let Some(model) = &update.model {
        out = out.set("model", model.clone());
    }
    out = out.set("updated_at", serde_json::to_value(Utc::now())?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryStore::new()))
    }

    fn new_bot(user_id: &str, name: &str, retailers: &[&str]) -> NewBot {
        NewBot {
            user_id: user_id.to_string(),
            name: name.to_string(),
            goals: None,
            retailers: retailers.iter().map(|r| r.to_string()).collect(),
            constraints: Default::default(),
            model: None,
        }
    }

    #[test]
    fn signup_creates_then_returns_existing_user() {
        let service = service();
        let first = service.signup("a@example.com", Some("Ada".to_string())).unwrap();
        assert_eq!(first.plan, Plan::Free);
        assert!(first.is_active);

        let second = service.signup("a@example.com", None).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn list_bots_is_scoped_to_owner() {
        let service = service();
        service.create_bot(new_bot("u1", "mine", &["amazon"])).unwrap();
        service.create_bot(new_bot("u2", "theirs", &["target"])).unwrap();

        let bots = service.list_bots("u1").unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].name, "mine");
    }

    #[test]
    fn update_bot_touches_only_named_fields() {
        let service = service();
        let bot = service.create_bot(new_bot("u1", "old", &["amazon"])).unwrap();

        let updated = service
            .update_bot(
                &bot.id,
                BotUpdate {
                    name: Some("new".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "new");
        assert_eq!(updated.retailers, vec!["amazon"]);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_bot_validates_id_before_lookup() {
        let service = service();
        let err = service.update_bot("not-a-uuid", BotUpdate::default()).unwrap_err();
        assert!(matches!(err, AccountError::InvalidBotId(_)));

        let missing = Uuid::new_v4().to_string();
        let err = service.update_bot(&missing, BotUpdate::default()).unwrap_err();
        assert!(matches!(err, AccountError::BotNotFound));
    }

    #[test]
    fn delete_bot_is_a_plain_store_operation() {
        let service = service();
        let bot = service.create_bot(new_bot("u1", "b", &[])).unwrap();
        service.delete_bot(&bot.id).unwrap();
        assert!(service.list_bots("u1").unwrap().is_empty());
        // deleting again is not an error
        service.delete_bot(&bot.id).unwrap();
    }
}
