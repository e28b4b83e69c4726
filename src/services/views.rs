//! Read-only circulation views
//!
//! Joined projections over loans, items and members. These never mutate and
//! never join a transition's transaction; they see either the pre- or
//! post-transition state, never a partial one.

use crate::{
    error::AppResult,
    models::loan::{ActiveLoan, LoanRecord, MemberLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct ViewsService {
    repository: Repository,
}

impl ViewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All open loans
    pub async fn active_loans(&self) -> AppResult<Vec<ActiveLoan>> {
        self.repository.loans.get_active().await
    }

    /// Open loans past their due date
    pub async fn overdue_loans(&self) -> AppResult<Vec<ActiveLoan>> {
        self.repository.loans.get_overdue().await
    }

    /// One member's open loans
    pub async fn member_loans(&self, member_id: i32) -> AppResult<Vec<MemberLoan>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.get_member_loans(member_id).await
    }

    /// Every loan ever made, closed ones included
    pub async fn loan_history(&self) -> AppResult<Vec<LoanRecord>> {
        self.repository.loans.get_history().await
    }

    /// Count a member's open loans (feeds external lending-limit policies)
    pub async fn open_loan_count(&self, member_id: i32) -> AppResult<i64> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.count_open_for_member(member_id).await
    }
}
