/*
 * Responsibility
 * - POST /register, POST /login (public)
 * - login 成功時に access token を発行する (TokenCodec)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        users::UserResponse,
    },
    error::AppError,
    repos::user_repo::NewUser,
    services::auth::password,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::invalid_payload)?;

    let email = req.email.trim();

    if state.users.get_by_email(email).await?.is_some() {
        return Err(AppError::bad_request(
            "EMAIL_TAKEN",
            format!("user with email {email} already exists"),
        ));
    }

    let password_hash = password::hash(req.password.clone()).await?;

    // A concurrent register with the same email surfaces as RepoError::Conflict (409).
    let row = state
        .users
        .create(NewUser {
            first_name: req.first_name.trim(),
            last_name: req.last_name.trim(),
            email,
            password_hash: &password_hash,
        })
        .await?;

    tracing::info!(user_id = row.id, "user registered");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::invalid_payload)?;

    let invalid = || AppError::bad_request("INVALID_CREDENTIALS", "invalid email or password");

    let user = state
        .users
        .get_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify(user.password.clone(), req.password.clone()).await {
        tracing::info!(user_id = user.id, "login rejected: wrong password");
        return Err(invalid());
    }

    let token = state.auth.tokens().issue(user.id)?;

    Ok(Json(LoginResponse { token }))
}
