use axum::extract::FromRequestParts;
use axum::http::{Extensions, request::Parts};

use crate::error::AppError;

use super::{AuthCtx, NO_IDENTITY};

/// Read the authenticated user id from request extensions.
///
/// Soft-fails: returns `NO_IDENTITY` (-1) when the access middleware did not run
/// or did not attach an identity. `-1` must never be used as a lookup key.
pub fn read_identity(extensions: &Extensions) -> i64 {
    extensions
        .get::<AuthCtx>()
        .map(|ctx| ctx.user_id)
        .unwrap_or(NO_IDENTITY)
}

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 403 を返す（middleware 未設定）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match read_identity(&parts.extensions) {
            NO_IDENTITY => Err(AppError::Forbidden),
            user_id => Ok(AuthCtxExtractor(AuthCtx::new(user_id))),
        }
    }
}
