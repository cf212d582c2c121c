pub mod task;
pub mod user;

pub use task::{
    parse_task_id, CreateTaskRequest, Task, TaskChanges, TaskDraft, TaskStatus, UpdateTaskRequest,
};
pub use user::{normalize_email, NewUser, User, UserSummary};
