//! Item (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Catalog item model from database.
///
/// `available` is owned by the loan ledger: it starts `true` at insertion and
/// is flipped only inside a borrow/return transition, never by callers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub creator: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Create item request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Creator must not be empty"))]
    pub creator: String,
}
