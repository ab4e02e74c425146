/*
 * Responsibility
 * - Users の response DTO (password hash は含めない)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::user_repo::UserRow;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}
