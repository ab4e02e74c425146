/*
 * Responsibility
 * - products CRUD
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub price: f64,
    pub quantity: i32,
}

/// `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProductChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

pub async fn list(pool: &PgPool) -> RepoResult<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, name, description, image, price, quantity, created_at
        FROM products
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get(pool: &PgPool, product_id: i64) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, name, description, image, price, quantity, created_at
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn create(pool: &PgPool, product: NewProduct<'_>) -> RepoResult<ProductRow> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (name, description, image, price, quantity)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, image, price, quantity, created_at
        "#,
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.image)
    .bind(product.price)
    .bind(product.quantity)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    product_id: i64,
    changes: ProductChanges<'_>,
) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            image = COALESCE($4, image),
            price = COALESCE($5, price),
            quantity = COALESCE($6, quantity)
        WHERE id = $1
        RETURNING id, name, description, image, price, quantity, created_at
        "#,
    )
    .bind(product_id)
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.image)
    .bind(changes.price)
    .bind(changes.quantity)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, product_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM products
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
