//! access token (JWT, HMAC) 検証 → AuthCtx を extensions に入れる
//!
//! Per request:
//! - `Authorization` header の値をそのまま token として扱う (`Bearer ` prefix は剥がさない)
//! - header が無ければ空文字 → parse で失敗 → 403
//! - 署名 / alg / 期限 の検証失敗 → 403
//! - `userID` claim が無い / 数値文字列でない → 403 (応答を書かずに打ち切ることはしない)
//! - user lookup 失敗 (not found / storage) → 403
//! - 成功時のみ AuthCtx を insert して inner handler へ
//!
//! No retry, no timeout here: a slow lookup holds the request until the
//! HTTP-level timeout in `middleware::http` fires.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthGate;

/// Put every route registered so far on `router` behind the access check.
///
/// `route_layer` なので、未登録 path は 403 ではなく 404 のまま。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/products", get(list_products));
/// let protected = middleware::auth::access::apply(protected, state.auth.clone());
/// ```
pub fn apply<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<AuthGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let claims = match gate.tokens().parse(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "failed to validate token");
            return Err(AppError::Forbidden);
        }
    };

    let user_id = match claims.subject() {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(error = %err, "invalid subject claim");
            return Err(AppError::Forbidden);
        }
    };

    let user = match gate.users().get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id, "failed to get user by id: not found");
            return Err(AppError::Forbidden);
        }
        Err(err) => {
            tracing::warn!(user_id, error = %err, "failed to get user by id");
            return Err(AppError::Forbidden);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user.id));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Extension, Json,
        body::to_bytes,
        http::{Extensions, StatusCode},
        routing::get,
    };
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::{AuthCtxExtractor, read_identity};
    use crate::repos::{error::RepoError, user_repo::UserRow};
    use crate::services::auth::{TokenCodec, UserLookup, token};

    const SECRET: &str = "s3cr3t";

    #[derive(Default)]
    struct InMemoryUsers {
        users: HashMap<i64, UserRow>,
        fail: bool,
    }

    impl InMemoryUsers {
        fn with_ids(ids: &[i64]) -> Self {
            let users = ids
                .iter()
                .map(|&id| {
                    (
                        id,
                        UserRow {
                            id,
                            first_name: "Ada".to_string(),
                            last_name: "Lovelace".to_string(),
                            email: format!("user{id}@example.com"),
                            password: String::new(),
                            created_at: Utc::now(),
                        },
                    )
                })
                .collect();
            Self { users, fail: false }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl UserLookup for InMemoryUsers {
        async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError> {
            if self.fail {
                return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
            }
            Ok(self.users.get(&id).cloned())
        }
    }

    type Calls = Arc<AtomicUsize>;

    async fn whoami(
        Extension(calls): Extension<Calls>,
        AuthCtxExtractor(ctx): AuthCtxExtractor,
        extensions: Extensions,
    ) -> Json<serde_json::Value> {
        calls.fetch_add(1, Ordering::SeqCst);
        Json(serde_json::json!({
            "extracted": ctx.user_id,
            "read": read_identity(&extensions),
        }))
    }

    fn app(users: InMemoryUsers) -> (Router, Calls, Arc<TokenCodec>) {
        let tokens = Arc::new(TokenCodec::new(SECRET, 3600).unwrap());
        let gate = AuthGate::new(tokens.clone(), Arc::new(users));
        let calls: Calls = Arc::new(AtomicUsize::new(0));

        let router = apply(Router::new().route("/me", get(whoami)), gate)
            .route("/open", get(|| async { "open" }))
            .layer(Extension(calls.clone()));

        (router, calls, tokens)
    }

    async fn send(router: Router, auth: Option<&str>, path: &str) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let res = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn assert_permission_denied(status: StatusCode, body: &[u8]) {
        assert_eq!(status, StatusCode::FORBIDDEN);
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json["error"]["message"], "permission denied");
    }

    #[tokio::test]
    async fn missing_header_is_forbidden_and_handler_not_called() {
        let (router, calls, _) = app(InMemoryUsers::with_ids(&[1]));
        let (status, body) = send(router, None, "/me").await;
        assert_permission_denied(status, &body);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_for_known_user_reaches_handler_once() {
        let (router, calls, tokens) = app(InMemoryUsers::with_ids(&[42]));
        let token = tokens.issue(42).unwrap();

        let (status, body) = send(router, Some(&token), "/me").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["extracted"], 42);
        assert_eq!(json["read"], 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bearer_prefix_is_not_stripped() {
        let (router, calls, tokens) = app(InMemoryUsers::with_ids(&[42]));
        let token = tokens.issue(42).unwrap();

        let (status, body) = send(router, Some(&format!("Bearer {token}")), "/me").await;
        assert_permission_denied(status, &body);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_user_is_forbidden() {
        let (router, calls, tokens) = app(InMemoryUsers::with_ids(&[1]));
        let token = tokens.issue(999).unwrap();

        let (status, body) = send(router, Some(&token), "/me").await;
        assert_permission_denied(status, &body);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_failure_is_forbidden() {
        let (router, calls, tokens) = app(InMemoryUsers::failing());
        let token = tokens.issue(1).unwrap();

        let (status, body) = send(router, Some(&token), "/me").await;
        assert_permission_denied(status, &body);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_and_foreign_tokens_are_forbidden() {
        let (router, calls, _) = app(InMemoryUsers::with_ids(&[1]));
        let now = Utc::now().timestamp();
        let expired = token::issue_at(SECRET.as_bytes(), 1, -10, now).unwrap();
        let foreign = token::issue_at(b"other", 1, 3600, now).unwrap();

        for token in [expired, foreign, "garbage".to_string()] {
            let (status, body) = send(router.clone(), Some(&token), "/me").await;
            assert_permission_denied(status, &body);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // Malformed subject claims answer 403 instead of dropping the response.
    #[tokio::test]
    async fn malformed_subject_claim_is_forbidden() {
        let (router, calls, _) = app(InMemoryUsers::with_ids(&[1]));
        let claims = serde_json::json!({
            "userID": "not-a-number",
            "expiredAt": Utc::now().timestamp() + 3600,
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let (status, body) = send(router, Some(&token), "/me").await;
        assert_permission_denied(status, &body);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn routes_added_after_apply_are_public() {
        let (router, _, _) = app(InMemoryUsers::default());
        let (status, body) = send(router, None, "/open").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"open");
    }
}
