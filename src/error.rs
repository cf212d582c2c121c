//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type every service operation returns.
//! Each variant carries the human-readable message that is sent to the client and
//! maps to exactly one HTTP status.
//!
//! `AppError` implements `actix_web::error::ResponseError`, which makes it the single
//! place where typed errors are translated into responses. Every error body is a flat
//! JSON object with a `message` field. Only `AppError::Internal` is logged, and its
//! details never reach the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message returned to clients for every unexpected server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all errors a request can end with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    #[error("{0}")]
    Validation(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 409).
    #[error("{0}")]
    Conflict(String),
    /// Missing or invalid credentials or bearer token (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),
    /// The route or the owned resource does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),
    /// Anything unexpected (HTTP 500). The message is for the server log only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The message that goes into the response body.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("request failed: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

/// Store failures are unexpected at this layer. Duplicates that carry domain
/// meaning are mapped by the service that expects them before reaching here.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// Only the first message (by field name, for a stable response) is reported.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
            .map(|(field, err)| match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::Validation(message)
    }
}

/// Token failures are always reported as a bare 401 so that the reason
/// (expired, bad signature, wrong issuer) is not exposed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized("Unauthorized".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password hashing failed: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::Internal(format!("blocking task failed: {}", error))
    }
}
