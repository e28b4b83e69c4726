//! Loans repository: the borrow/return transition engine and loan queries

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{ActiveLoan, Loan, LoanRecord, MemberLoan},
    repository::items::ItemsRepository,
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    // =========================================================================
    // Transitions
    //
    // Loan rows and the item availability flag must change together, so both
    // transitions run as one transaction: preconditions are re-checked on
    // locked rows inside it, and any early return rolls the whole unit back.
    // Concurrent borrows of the same item serialize on the item row lock;
    // exactly one sees `available = true`.
    // =========================================================================

    /// Borrow an item: create the loan and mark the item unavailable
    pub async fn borrow(
        &self,
        item_id: i32,
        member_id: i32,
        loan_period: Duration,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let item = ItemsRepository::get_for_update(&mut tx, item_id).await?;
        if !item.available {
            return Err(AppError::ItemUnavailable(format!(
                "Item {} ({}) is already on loan",
                item.id, item.title
            )));
        }

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
                .bind(member_id)
                .fetch_one(&mut *tx)
                .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                member_id
            )));
        }

        let now = Utc::now();

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (item_id, member_id, borrowed_at, due_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(member_id)
        .bind(now)
        .bind(now + loan_period)
        .fetch_one(&mut *tx)
        .await?;

        ItemsRepository::set_availability(&mut tx, item_id, false).await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Return a loan: stamp the return time and mark the item available again
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.returned_at.is_some() {
            return Err(AppError::AlreadyReturned(format!(
                "Loan {} was already returned",
                loan_id
            )));
        }

        let returned = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET returned_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(Utc::now())
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        ItemsRepository::set_availability(&mut tx, loan.item_id, true).await?;

        tx.commit().await?;

        Ok(returned)
    }

    // =========================================================================
    // Read views
    // =========================================================================

    /// All open loans with item and member details
    pub async fn get_active(&self) -> AppResult<Vec<ActiveLoan>> {
        let loans = sqlx::query_as::<_, ActiveLoan>(
            r#"
            SELECT l.id as loan_id, i.title as item_title, m.name as member_name,
                   l.borrowed_at, l.due_at
            FROM loans l
            JOIN items i ON l.item_id = i.id
            JOIN members m ON l.member_id = m.id
            WHERE l.returned_at IS NULL
            ORDER BY l.borrowed_at, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Open loans past their due date
    pub async fn get_overdue(&self) -> AppResult<Vec<ActiveLoan>> {
        let loans = sqlx::query_as::<_, ActiveLoan>(
            r#"
            SELECT l.id as loan_id, i.title as item_title, m.name as member_name,
                   l.borrowed_at, l.due_at
            FROM loans l
            JOIN items i ON l.item_id = i.id
            JOIN members m ON l.member_id = m.id
            WHERE l.returned_at IS NULL AND l.due_at < NOW()
            ORDER BY l.due_at, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Open loans for one member, item details joined
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<MemberLoan>> {
        let loans = sqlx::query_as::<_, MemberLoan>(
            r#"
            SELECT i.title as item_title, i.creator, l.borrowed_at, l.due_at
            FROM loans l
            JOIN items i ON l.item_id = i.id
            WHERE l.member_id = $1 AND l.returned_at IS NULL
            ORDER BY l.borrowed_at, l.id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Every loan ever made, closed ones included
    pub async fn get_history(&self) -> AppResult<Vec<LoanRecord>> {
        let loans = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT l.id as loan_id, i.title as item_title, m.name as member_name,
                   l.borrowed_at, l.due_at, l.returned_at
            FROM loans l
            JOIN items i ON l.item_id = i.id
            JOIN members m ON l.member_id = m.id
            ORDER BY l.borrowed_at, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Count a member's open loans
    pub async fn count_open_for_member(&self, member_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE member_id = $1 AND returned_at IS NULL",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
