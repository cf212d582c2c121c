use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::error::AppError;

/// A stored user. The password hash never leaves the server: this type is not
/// serializable, responses use `UserSummary`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public view of a user returned by signup and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A user that has not been persisted yet. Only constructible through
/// `NewUser::create`, which hashes the password first.
#[derive(Debug, Clone)]
pub struct NewUser {
    name: String,
    email: String,
    password_hash: String,
}

impl NewUser {
    pub async fn create(
        name: &str,
        email: &str,
        password: &str,
        cost: u32,
    ) -> Result<Self, AppError> {
        let password_hash = hash_password(password, cost).await?;
        Ok(Self {
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Emails are compared case-insensitively; they are stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
