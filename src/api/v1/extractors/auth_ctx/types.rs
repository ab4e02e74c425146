/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - extensions は型で key されるので、AuthCtx 自体が唯一の予約 key になる
 * - 1 request に 1 つ。request 終了とともに破棄される
 */

/// `user_id` returned when no identity is attached to the request.
pub const NO_IDENTITY: i64 = -1;

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
}

impl AuthCtx {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
