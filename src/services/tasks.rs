use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::cache::TaskCache;
use crate::error::AppError;
use crate::models::{parse_task_id, Task, TaskChanges, TaskDraft};
use crate::store::TaskStore;

/// Owner-scoped task operations with a cache-aside task list.
///
/// Reads go to the cache first and fill it on a miss. Writes go to the store
/// and then drop the owner's cache entry, so the next read is store-fresh.
/// Two concurrent requests of the same owner are not serialized: a slow list
/// can write its (older) snapshot back after a write invalidated the entry,
/// which stays until the TTL or the next write.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    cache: TaskCache,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, cache: TaskCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    /// All of `owner`'s tasks, newest first.
    pub async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, AppError> {
        if let Some(tasks) = self.cache.get_tasks(owner).await {
            log::debug!("task list cache hit for {}", owner);
            return Ok(tasks);
        }

        let tasks = self.store.list_by_owner(owner).await?;
        self.cache.put_tasks(owner, &tasks).await;
        Ok(tasks)
    }

    pub async fn create_task(&self, owner: Uuid, draft: TaskDraft) -> Result<Task, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        draft.validate()?;

        let task = self.store.insert(owner, draft).await?;
        self.cache.invalidate(owner).await;
        log::info!("task {} created for {}", task.id, owner);
        Ok(task)
    }

    /// Applies `changes` to the task `task_id` if `owner` owns it.
    ///
    /// A task that does not exist and a task owned by someone else both give
    /// the same `NotFound`.
    pub async fn update_task(
        &self,
        owner: Uuid,
        task_id: &str,
        changes: TaskChanges,
    ) -> Result<Task, AppError> {
        let id = parse_task_id(task_id)?;
        changes.validate()?;

        let task = self
            .store
            .update_owned(owner, id, changes)
            .await?
            .ok_or_else(task_not_found)?;

        self.cache.invalidate(owner).await;
        Ok(task)
    }

    pub async fn delete_task(&self, owner: Uuid, task_id: &str) -> Result<(), AppError> {
        let id = parse_task_id(task_id)?;

        if !self.store.delete_owned(owner, id).await? {
            return Err(task_not_found());
        }

        self.cache.invalidate(owner).await;
        log::info!("task {} deleted for {}", id, owner);
        Ok(())
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
