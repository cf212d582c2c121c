use std::sync::Arc;

use validator::Validate;

use crate::auth::{verify_password, AuthResponse, LoginInput, SignupInput, TokenIssuer};
use crate::error::AppError;
use crate::models::{normalize_email, NewUser, User, UserSummary};
use crate::store::{StoreError, UserStore};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Signup and login on top of a user store, bcrypt and the token issuer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Registers a new account and signs the caller in.
    pub async fn signup(&self, input: SignupInput) -> Result<AuthResponse, AppError> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let new_user =
            NewUser::create(&input.name, &email, &input.password, self.bcrypt_cost).await?;
        let user = match self.users.insert(new_user).await {
            Ok(user) => user,
            // Lost a race with a concurrent signup for the same address.
            Err(StoreError::Duplicate) => return Err(email_taken()),
            Err(e) => return Err(e.into()),
        };

        log::info!("user {} signed up", user.id);
        self.session_for(&user)
    }

    /// Unknown email and wrong password give the same error.
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&input.password, &user.password_hash).await? {
            return Err(invalid_credentials());
        }

        self.session_for(&user)
    }

    fn session_for(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.tokens.issue(user.id)?,
            user: UserSummary::from(user),
        })
    }
}

fn email_taken() -> AppError {
    AppError::Conflict("Email already registered".into())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.into())
}
