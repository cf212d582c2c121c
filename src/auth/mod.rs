pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::UserSummary;

pub use extractors::AuthenticatedUserId;
pub use middleware::{authenticate, AuthMiddleware};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

/// Request body for `POST /api/auth/signup`.
///
/// Fields are optional so that a missing field produces the same 400 message
/// as a blank one instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup input after the presence check; validated by `AuthService::signup`.
#[derive(Debug, Clone, Validate)]
pub struct SignupInput {
    /// Display name, at least 2 characters after trimming.
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl SignupRequest {
    pub fn into_input(self) -> Result<SignupInput, AppError> {
        match (present(self.name), present(self.email), self.password) {
            (Some(name), Some(email), Some(password)) if !password.is_empty() => {
                Ok(SignupInput {
                    name,
                    email,
                    password,
                })
            }
            _ => Err(AppError::Validation(
                "name, email and password are required".into(),
            )),
        }
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn into_input(self) -> Result<LoginInput, AppError> {
        match (present(self.email), self.password) {
            (Some(email), Some(password)) if !password.is_empty() => {
                Ok(LoginInput { email, password })
            }
            _ => Err(AppError::Validation(
                "email and password are required".into(),
            )),
        }
    }
}

/// Response structure after successful signup or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token for subsequent requests.
    pub token: String,
    pub user: UserSummary,
}

/// Trims a text field and treats blank as missing. Passwords are not trimmed.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
