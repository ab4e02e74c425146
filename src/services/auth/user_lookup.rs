/*
 * Responsibility
 * - middleware が identity を解決するための seam (UserLookup)
 * - 本番は UserRepo (Postgres)、テストは in-memory 実装を差し込む
 */
use async_trait::async_trait;

use crate::repos::{error::RepoError, user_repo::UserRow};

/// `Ok(None)` is "not found"; the middleware treats it the same as `Err`.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError>;
}
