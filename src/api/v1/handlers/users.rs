/*
 * Responsibility
 * - GET /users/me (protected)
 * - identity は AuthCtxExtractor 経由でのみ受け取る
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::users::UserResponse, extractors::AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .get_by_id(ctx.user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}
