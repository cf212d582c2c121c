pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Task routes sit behind `AuthMiddleware`.
///
/// The app also needs `web::Data<AppState>` and, for the JSON 404 fallback,
/// `.default_service(web::to(routes::not_found))`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::health)
        .service(
            web::scope("/api/auth")
                .service(auth::signup)
                .service(auth::login),
        )
        .service(
            web::scope("/api/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Turns body deserialization failures into `{message}` 400 responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "message": "Route not found" }))
}
