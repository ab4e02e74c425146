/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, users: UserRepo, auth: AuthGate
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use crate::repos::user_repo::UserRepo;
use crate::services::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub users: UserRepo,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, users: UserRepo, auth: AuthGate) -> Self {
        Self { db, users, auth }
    }
}
