//! Persistence for users and tasks.
//!
//! Services talk to the `UserStore` and `TaskStore` traits. `postgres` holds the
//! production implementations on top of `sqlx`; `memory` holds in-process ones
//! selected with `DATABASE_URL=memory://` and used throughout the tests.
//!
//! Every task operation takes the owner's id and filters on it inside the
//! store, so there is no way to read or change a task by id alone.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewUser, Task, TaskChanges, TaskDraft, User};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate record")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks a user up by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new user, assigning its id and timestamps.
    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `owner`, newest `created_at` first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Persists a new task for `owner`, assigning its id and timestamps.
    async fn insert(&self, owner: Uuid, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Applies `changes` to the task matching both `id` and `owner`.
    /// Returns `None` when no such task exists.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError>;

    /// Deletes the task matching both `id` and `owner`. Returns whether one was deleted.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}
