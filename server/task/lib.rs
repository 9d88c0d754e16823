pub mod types;
pub mod workflow;

pub use types::{Task, TaskStatus, TaskUpdate};
pub use workflow::{TaskWorkflow, WorkflowError, TASK_COLLECTION};
