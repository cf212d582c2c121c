use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewUser, Task, TaskChanges, TaskDraft, User};

/// In-process user store. Data lives as long as the value does.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(user.email()))
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            password_hash: user.password_hash().to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());
        Ok(stored)
    }
}

/// In-process task store. Tasks are kept in insertion order, so ties on
/// `created_at` list the later insert first.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert(&self, owner: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            owner,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)
            .map(|task| {
                if !changes.is_empty() {
                    changes.apply_to(task);
                    task.updated_at = Utc::now();
                }
                task.clone()
            }))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.owner == owner));
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title)
    }

    #[actix_rt::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = store.insert(owner, draft("First")).await.unwrap();
        store.insert(other, draft("Foreign")).await.unwrap();
        let second = store.insert(owner, draft("Second")).await.unwrap();

        let listed = store.list_by_owner(owner).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[actix_rt::test]
    async fn test_update_and_delete_require_owner() {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = store.insert(owner, draft("Mine")).await.unwrap();

        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..TaskChanges::default()
        };
        assert!(store
            .update_owned(intruder, task.id, changes.clone())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_owned(intruder, task.id).await.unwrap());

        let untouched = store.list_by_owner(owner).await.unwrap();
        assert_eq!(untouched[0].status, TaskStatus::Pending);

        let updated = store
            .update_owned(owner, task.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(store.delete_owned(owner, task.id).await.unwrap());
        assert!(store.list_by_owner(owner).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        let ann = NewUser::create("Ann", "ann@x.com", "secret1", 4).await.unwrap();
        let again = NewUser::create("Ann", "ANN@x.com", "secret2", 4).await.unwrap();

        store.insert(ann).await.unwrap();
        assert!(matches!(store.insert(again).await, Err(StoreError::Duplicate)));
        assert!(store.find_by_email("ann@x.com").await.unwrap().is_some());
    }
}
