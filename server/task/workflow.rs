use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::{Bot, BOT_COLLECTION};
use crate::search::{Candidate, CandidateSearch, SearchError};
use crate::store::{DocumentStore, Filter, StoreError};

use super::types::{Task, TaskStatus, TaskUpdate};

pub const TASK_COLLECTION: &str = "task";

const DEFAULT_CANDIDATE_LIMIT: i64 = 5;
const TASK_PAGE_LIMIT: usize = 50;
const FALLBACK_RETAILER: &str = "amazon";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("bot not found")]
    BotNotFound,
    #[error("task not found")]
    TaskNotFound,
    #[error("invalid task id: {0}")]
    InvalidTaskId(String),
    #[error("invalid candidate index: {0}")]
    InvalidIndex(i64),
    #[error("task already resolved with a different selection")]
    AlreadyResolved,
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored document did not decode: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Drives a task from creation to a human-approved terminal state. This is
/// the only component that writes `status` or `selection`; everything else
/// treats task documents as read-only.
pub struct TaskWorkflow {
    store: Arc<dyn DocumentStore>,
    search: Arc<dyn CandidateSearch>,
}

impl TaskWorkflow {
    pub fn new(store: Arc<dyn DocumentStore>, search: Arc<dyn CandidateSearch>) -> Self {
        Self { store, search }
    }

    /// Creates a task for `prompt` against the bot's preferred retailer.
    /// Candidate generation runs before anything is written, so a search
    /// failure leaves no partial task behind.
    pub fn create_task(
        &self,
        user_id: &str,
        bot_id: &str,
        prompt: &str,
    ) -> Result<Task, WorkflowError> {
        let bot = self.find_bot(bot_id)?;
        let retailer = bot
            .retailers
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_RETAILER.to_string());

        let candidates = self
            .search
            .search(prompt, Some(&retailer), DEFAULT_CANDIDATE_LIMIT)
            .map_err(|err| {
                warn!(bot_id, %err, "candidate search failed, task not created");
                err
            })?;

        let mut task = Task {
            id: String::new(),
            user_id: user_id.to_string(),
            bot_id: bot_id.to_string(),
            prompt: prompt.to_string(),
            status: TaskStatus::AwaitingApproval,
            logs: vec![
                "Task created".to_string(),
                format!("Searched {} candidates", candidates.len()),
            ],
            candidates,
            selection: None,
            created_at: Utc::now(),
        };
        let doc = serde_json::to_value(&task)?;
        task.id = self.store.create(TASK_COLLECTION, doc)?;
        info!(task_id = %task.id, bot_id, "task created");
        Ok(task)
    }

    /// Tasks owned by `user_id`, optionally narrowed to one bot. Natural
    /// store order, capped at one page.
    pub fn list_tasks(
        &self,
        user_id: &str,
        bot_id: Option<&str>,
    ) -> Result<Vec<Task>, WorkflowError> {
        let mut filter = Filter::new().field("user_id", user_id);
        if let Some(bot_id) = bot_id {
            filter = filter.field("bot_id", bot_id);
        }
        let docs = self
            .store
            .find_many(TASK_COLLECTION, &filter, TASK_PAGE_LIMIT)?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(WorkflowError::from))
            .collect()
    }

    /// Records the human's pick and moves the task to `succeeded`.
    ///
    /// Re-approval: replaying the approval with the index already recorded
    /// is a no-op returning the task as stored; any other index on a
    /// resolved task fails with `AlreadyResolved`. The commit itself is a
    /// conditional update guarded on `awaiting_approval`, so two racing
    /// approvals cannot interleave — the loser re-reads and goes through
    /// the same terminal-state check.
    pub fn approve(&self, task_id: &str, index: i64) -> Result<Task, WorkflowError> {
        if Uuid::parse_str(task_id).is_err() {
            return Err(WorkflowError::InvalidTaskId(task_id.to_string()));
        }
        let task = self
            .fetch_task(task_id)?
            .ok_or(WorkflowError::TaskNotFound)?;

        if index < 0 || index as usize >= task.candidates.len() {
            return Err(WorkflowError::InvalidIndex(index));
        }
        let selection = task.candidates[index as usize].clone();

        if task.status.is_terminal() {
            return resolve_replay(task, &selection);
        }

        let update = TaskUpdate {
            status: TaskStatus::Succeeded,
            selection: selection.clone(),
        };
        let guard = Filter::by_id(task_id).field("status", TaskStatus::AwaitingApproval.as_str());
        match self
            .store
            .find_one_and_update(TASK_COLLECTION, &guard, &update.to_store_update()?)?
        {
            Some(doc) => {
                info!(task_id, index, "task approved");
                Ok(serde_json::from_value(doc)?)
            }
            None => {
                // Lost a race: someone resolved (or deleted) the task
                // between our read and the guarded write.
                let current = self
                    .fetch_task(task_id)?
                    .ok_or(WorkflowError::TaskNotFound)?;
                resolve_replay(current, &selection)
            }
        }
    }

    fn fetch_task(&self, task_id: &str) -> Result<Option<Task>, WorkflowError> {
        match self
            .store
            .find_one(TASK_COLLECTION, &Filter::by_id(task_id))?
        {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    fn find_bot(&self, bot_id: &str) -> Result<Bot, WorkflowError> {
        // A malformed id can never resolve, mirroring the not-found path.
        if Uuid::parse_str(bot_id).is_err() {
            return Err(WorkflowError::BotNotFound);
        }
        let doc = self
            .store
            .find_one(BOT_COLLECTION, &Filter::by_id(bot_id))?
            .ok_or(WorkflowError::BotNotFound)?;
        Ok(serde_json::from_value(doc)?)
    }
}

fn resolve_replay(task: Task, selection: &Candidate) -> Result<Task, WorkflowError> {
    if task.status == TaskStatus::Succeeded && task.selection.as_ref() == Some(selection) {
        Ok(task)
    } else {
        Err(WorkflowError::AlreadyResolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountService, NewBot};
    use crate::search::StubSearch;
    use crate::store::MemoryStore;

    struct FailingSearch;

    impl CandidateSearch for FailingSearch {
        fn search(
            &self,
            _query: &str,
            _retailer: Option<&str>,
            _limit: i64,
        ) -> Result<Vec<Candidate>, SearchError> {
            Err(SearchError::UpstreamUnavailable("stubbed outage".to_string()))
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        accounts: AccountService,
        workflow: TaskWorkflow,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(StubSearch::new()))
    }

    fn fixture_with(search: Arc<dyn CandidateSearch>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            accounts: AccountService::new(store.clone()),
            workflow: TaskWorkflow::new(store.clone(), search),
            store,
        }
    }

    fn make_bot(fixture: &Fixture, user_id: &str, retailers: &[&str]) -> String {
        fixture
            .accounts
            .create_bot(NewBot {
                user_id: user_id.to_string(),
                name: "shopper".to_string(),
                goals: None,
                retailers: retailers.iter().map(|r| r.to_string()).collect(),
                constraints: Default::default(),
                model: None,
            })
            .unwrap()
            .id
    }

    #[test]
    fn create_task_requires_an_existing_bot() {
        let fx = fixture();
        let missing = Uuid::new_v4().to_string();
        let err = fx.workflow.create_task("u1", &missing, "mouse").unwrap_err();
        assert!(matches!(err, WorkflowError::BotNotFound));

        let err = fx.workflow.create_task("u1", "garbage-id", "mouse").unwrap_err();
        assert!(matches!(err, WorkflowError::BotNotFound));

        let docs = fx
            .store
            .find_many(TASK_COLLECTION, &Filter::new(), 50)
            .unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn create_task_lands_in_awaiting_approval() {
        let fx = fixture();
        let bot_id = make_bot(&fx, "u1", &["amazon"]);

        let task = fx.workflow.create_task("u1", &bot_id, "wireless mouse").unwrap();
        assert_eq!(task.status, TaskStatus::AwaitingApproval);
        assert_eq!(task.candidates.len(), 5);
        assert!(task.candidates.iter().all(|c| c.retailer == "amazon"));
        assert!(task.selection.is_none());
        assert_eq!(
            task.logs,
            vec!["Task created".to_string(), "Searched 5 candidates".to_string()]
        );
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn create_task_uses_first_bot_retailer_with_amazon_fallback() {
        let fx = fixture();
        let target_bot = make_bot(&fx, "u1", &["target", "walmart"]);
        let task = fx.workflow.create_task("u1", &target_bot, "mouse").unwrap();
        assert!(task.candidates.iter().all(|c| c.retailer == "target"));

        let bare_bot = make_bot(&fx, "u1", &[]);
        let task = fx.workflow.create_task("u1", &bare_bot, "mouse").unwrap();
        assert!(task.candidates.iter().all(|c| c.retailer == "amazon"));
    }

    #[test]
    fn create_task_persists_nothing_when_search_fails() {
        let fx = fixture_with(Arc::new(FailingSearch));
        let bot_id = make_bot(&fx, "u1", &["amazon"]);

        let err = fx.workflow.create_task("u1", &bot_id, "mouse").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Search(SearchError::UpstreamUnavailable(_))
        ));

        let docs = fx
            .store
            .find_many(TASK_COLLECTION, &Filter::new(), 50)
            .unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn list_tasks_round_trips_and_filters_by_bot() {
        let fx = fixture();
        let bot_a = make_bot(&fx, "u1", &["amazon"]);
        let bot_b = make_bot(&fx, "u1", &["walmart"]);
        make_bot(&fx, "u2", &["amazon"]);

        let created = fx.workflow.create_task("u1", &bot_a, "mouse").unwrap();
        fx.workflow.create_task("u1", &bot_b, "keyboard").unwrap();

        let all = fx.workflow.list_tasks("u1", None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].prompt, created.prompt);
        assert_eq!(all[0].candidates, created.candidates);
        assert_eq!(all[0].logs, created.logs);

        let scoped = fx.workflow.list_tasks("u1", Some(&bot_b)).unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].prompt, "keyboard");

        assert!(fx.workflow.list_tasks("u3", None).unwrap().is_empty());
    }

    #[test]
    fn list_tasks_caps_the_page() {
        let fx = fixture();
        let bot_id = make_bot(&fx, "u1", &["amazon"]);
        for n in 0..55 {
            fx.workflow
                .create_task("u1", &bot_id, &format!("item {}", n))
                .unwrap();
        }
        assert_eq!(fx.workflow.list_tasks("u1", None).unwrap().len(), 50);
    }

    #[test]
    fn approve_records_selection_and_succeeds() {
        let fx = fixture();
        let bot_id = make_bot(&fx, "u1", &["amazon"]);
        let task = fx.workflow.create_task("u1", &bot_id, "mouse").unwrap();

        let approved = fx.workflow.approve(&task.id, 2).unwrap();
        assert_eq!(approved.status, TaskStatus::Succeeded);
        assert_eq!(approved.selection.as_ref(), Some(&task.candidates[2]));

        // the stored document was updated in place
        let stored = fx.workflow.list_tasks("u1", None).unwrap().remove(0);
        assert_eq!(stored.status, TaskStatus::Succeeded);
        assert_eq!(stored.selection, approved.selection);
    }

    #[test]
    fn approve_rejects_out_of_range_index_without_mutation() {
        let fx = fixture();
        let bot_id = make_bot(&fx, "u1", &["amazon"]);
        let task = fx.workflow.create_task("u1", &bot_id, "mouse").unwrap();

        for index in [5, -1] {
            let err = fx.workflow.approve(&task.id, index).unwrap_err();
            assert!(matches!(err, WorkflowError::InvalidIndex(i) if i == index));
        }

        let stored = fx.workflow.list_tasks("u1", None).unwrap().remove(0);
        assert_eq!(stored.status, TaskStatus::AwaitingApproval);
        assert!(stored.selection.is_none());
    }

    #[test]
    fn approve_distinguishes_missing_from_malformed_ids() {
        let fx = fixture();
        let err = fx.workflow.approve("not-a-uuid", 0).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTaskId(_)));

        let missing = Uuid::new_v4().to_string();
        let err = fx.workflow.approve(&missing, 0).unwrap_err();
        assert!(matches!(err, WorkflowError::TaskNotFound));
    }

    #[test]
    fn reapproval_is_idempotent_on_the_same_index_only() {
        let fx = fixture();
        let bot_id = make_bot(&fx, "u1", &["amazon"]);
        let task = fx.workflow.create_task("u1", &bot_id, "mouse").unwrap();

        let first = fx.workflow.approve(&task.id, 1).unwrap();
        let replay = fx.workflow.approve(&task.id, 1).unwrap();
        assert_eq!(replay.status, TaskStatus::Succeeded);
        assert_eq!(replay.selection, first.selection);

        let err = fx.workflow.approve(&task.id, 3).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyResolved));

        // the original selection survived the rejected re-approval
        let stored = fx.workflow.list_tasks("u1", None).unwrap().remove(0);
        assert_eq!(stored.selection, first.selection);
    }
}
