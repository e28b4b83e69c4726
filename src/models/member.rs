//! Member (directory entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Member model from database. Immutable after insertion in this core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

/// Create member request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    /// Free-form contact info (email, phone); may be empty
    #[serde(default)]
    pub contact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        let member = CreateMember {
            name: String::new(),
            contact: "alice@example.org".to_string(),
        };
        assert!(member.validate().is_err());
    }

    #[test]
    fn contact_may_be_empty() {
        let member = CreateMember {
            name: "Alice".to_string(),
            contact: String::new(),
        };
        assert!(member.validate().is_ok());
    }
}
