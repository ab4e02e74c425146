/*
 * Responsibility
 * - Products の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::product_repo::{ProductChanges, ProductRow};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i32,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.description.trim().is_empty() {
            return Err("description is required");
        }
        if self.image.trim().is_empty() {
            return Err("image is required");
        }
        validate_price(self.price)?;
        if self.quantity < 0 {
            return Err("quantity must be >= 0");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        for (value, msg) in [
            (&self.name, "name cannot be empty"),
            (&self.description, "description cannot be empty"),
            (&self.image, "image cannot be empty"),
        ] {
            if let Some(v) = value
                && v.trim().is_empty()
            {
                return Err(msg);
            }
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity
            && quantity < 0
        {
            return Err("quantity must be >= 0");
        }

        Ok(())
    }

    pub fn changes(&self) -> ProductChanges<'_> {
        ProductChanges {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            image: self.image.as_deref(),
            price: self.price,
            quantity: self.quantity,
        }
    }
}

fn validate_price(price: f64) -> Result<(), &'static str> {
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}
