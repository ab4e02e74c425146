/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public (health / register / login / product detail) と protected を分け、
 *   protected 側だけに access middleware を route_layer で掛ける
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, register},
    health::health,
    products::{create_product, delete_product, get_product, list_products, update_product},
    users::me,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/products/{product_id}", get(get_product));

    let protected = Router::new()
        .route("/users/me", get(me))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{product_id}",
            put(update_product).delete(delete_product),
        );
    let protected = access::apply(protected, state.auth.clone());

    public.merge(protected)
}
