/*
 * Responsibility
 * - /products 系 CRUD handler
 * - GET /products/{product_id} 以外は access middleware の内側で動く
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::products::{CreateProductRequest, ProductResponse, UpdateProductRequest},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::product_repo::{self, NewProduct},
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = product_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

pub async fn create_product(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate().map_err(AppError::invalid_payload)?;

    let row = product_repo::create(
        &state.db,
        NewProduct {
            name: req.name.trim(),
            description: &req.description,
            image: &req.image,
            price: req.price,
            quantity: req.quantity,
        },
    )
    .await?;

    tracing::info!(product_id = row.id, user_id = ctx.user_id, "product created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.db, product_id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate().map_err(AppError::invalid_payload)?;

    let row = product_repo::update(&state.db, product_id, req.changes())
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = product_repo::delete(&state.db, product_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}
