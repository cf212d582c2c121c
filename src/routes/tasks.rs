use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{CreateTaskRequest, UpdateTaskRequest},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Lists the authenticated user's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: `{ "tasks": [...] }`
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks(user.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, at least 2 characters.
/// - `description` (optional), defaults to an empty string.
/// - `dueDate` (optional): `YYYY-MM-DD` or an RFC 3339 timestamp.
/// - `status` (optional): `pending` (default) or `completed`.
///
/// ## Responses:
/// - `201 Created`: `{ "task": {...} }`
/// - `400 Bad Request`: missing or invalid fields.
/// - `401 Unauthorized`
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    body: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let draft = body.into_inner().into_draft()?;
    let task = state.tasks.create_task(user.0, draft).await?;
    Ok(HttpResponse::Created().json(json!({ "task": task })))
}

/// Updates any subset of `title`, `description`, `status` and `dueDate`.
///
/// The id is taken as a raw string so that a malformed id is a 400 from the
/// service rather than a routing miss.
///
/// ## Responses:
/// - `200 OK`: `{ "task": {...} }`
/// - `400 Bad Request`: malformed id or invalid fields.
/// - `401 Unauthorized`
/// - `404 Not Found`: no such task for this user.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update_task(user.0, &task_id, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Deletes a task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{ "message": "Task deleted" }`
/// - `400 Bad Request`: malformed id.
/// - `401 Unauthorized`
/// - `404 Not Found`: no such task for this user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete_task(user.0, &task_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
