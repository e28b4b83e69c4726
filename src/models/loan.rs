//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Loan model from database.
///
/// A loan with no `returned_at` is open; `returned_at` is stamped exactly once
/// by the return transition and never changes afterwards. Loans are the audit
/// trail and are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub item_id: i32,
    pub member_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.due_at < now
    }
}

/// Create loan request
#[derive(Debug, Deserialize)]
pub struct CreateLoan {
    pub item_id: i32,
    pub member_id: i32,
}

/// Open loan joined with item and member for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveLoan {
    pub loan_id: i32,
    pub item_title: String,
    pub member_name: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// One member's open loan joined with item details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberLoan {
    pub item_title: String,
    pub creator: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// Full history row, closed loans included
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanRecord {
    pub loan_id: i32,
    pub item_title: String,
    pub member_name: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}
