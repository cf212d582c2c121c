use crate::{
    auth::{LoginRequest, SignupRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account and returns `{token, user}` with 201.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let input = body.into_inner().into_input()?;
    let session = state.auth.signup(input).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Login user
///
/// Returns `{token, user}`; bad credentials give 401 "Invalid credentials".
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let input = body.into_inner().into_input()?;
    let session = state.auth.login(input).await?;
    Ok(HttpResponse::Ok().json(session))
}
