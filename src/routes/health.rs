use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Health check endpoint. Does not touch the store or the cache.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok"
    }))
}
