pub mod config;

#[path = "accounts/lib.rs"]
pub mod accounts;
#[path = "api/lib.rs"]
pub mod api;
#[path = "search/lib.rs"]
pub mod search;
#[path = "store/lib.rs"]
pub mod store;
#[path = "task/lib.rs"]
pub mod task;

pub use config::ServerConfig;
pub use search::{Candidate, CandidateSearch, StubSearch};
pub use store::{DocumentStore, MemoryStore};
pub use task::{Task, TaskStatus, TaskWorkflow};
