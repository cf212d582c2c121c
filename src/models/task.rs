use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is still open.
    #[default]
    Pending,
    /// Task is done.
    Completed,
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    /// Empty when the task was created without one.
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task.
    #[sqlx(rename = "owner_id")]
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated task ready to be inserted for its owner.
#[derive(Debug, Clone, Validate)]
pub struct TaskDraft {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Builds a draft with the defaults applied: empty description, pending status.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: None,
        }
    }
}

/// A partial update. `None` leaves the field untouched; for `due_date`,
/// `Some(None)` clears the stored date.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct TaskChanges {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self == &TaskChanges::default()
    }

    /// Applies the changes in place. Used by stores that do not update in SQL.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "due_date::deserialize")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl CreateTaskRequest {
    /// Checks required fields and produces a draft. Length rules are checked by
    /// `TaskService::create_task`.
    pub fn into_draft(self) -> Result<TaskDraft, AppError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("title is required".into()))?;

        Ok(TaskDraft {
            title,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            due_date: self.due_date,
        })
    }
}

/// Request body for `PUT /api/tasks/{id}`. Every field is optional; unknown
/// fields (including `owner`) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "due_date::deserialize_patch")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description.map(|d| d.trim().to_string()),
            status: request.status,
            due_date: request.due_date,
        }
    }
}

/// Parses a task id, rejecting anything that is not a UUID before it reaches a store.
pub fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation("Invalid task id".into()))
}

/// Serde helpers for `dueDate`, which clients send either as a plain
/// `YYYY-MM-DD` date (taken as midnight UTC) or as an RFC 3339 timestamp.
pub mod due_date {
    use super::*;
    use serde::{de, Deserializer};

    pub fn parse(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(instant.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))))
            .map_err(|_| format!("dueDate must be a date, got {:?}", raw))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map_err(de::Error::custom),
            None => Ok(None),
        }
    }

    /// Like `deserialize`, but keeps "present and null" apart from "absent"
    /// (the latter is handled by `#[serde(default)]`).
    pub fn deserialize_patch<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}
