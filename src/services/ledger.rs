//! Loan ledger service: the borrow/return state machine
//!
//! Each item cycles `available -> on loan -> available`. The transition logic
//! lives in the loans repository, where loan writes and the availability flip
//! share one atomic unit; this service supplies circulation policy (the loan
//! period) and is the only public path to those transitions.

use chrono::Duration;

use crate::{
    config::CirculationConfig,
    error::AppResult,
    models::loan::{CreateLoan, Loan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LedgerService {
    repository: Repository,
    loan_period: Duration,
}

impl LedgerService {
    pub fn new(repository: Repository, circulation: CirculationConfig) -> Self {
        Self {
            repository,
            loan_period: Duration::days(circulation.loan_period_days),
        }
    }

    /// Borrow an item for a member.
    ///
    /// Fails with `NotFound` when the item or member does not exist and with
    /// `ItemUnavailable` when the item is already on loan; both leave the
    /// store untouched.
    pub async fn borrow(&self, loan: CreateLoan) -> AppResult<Loan> {
        let created = self
            .repository
            .loans
            .borrow(loan.item_id, loan.member_id, self.loan_period)
            .await?;

        tracing::info!(
            "Item {} borrowed by member {} (loan {}, due {})",
            created.item_id,
            created.member_id,
            created.id,
            created.due_at
        );

        Ok(created)
    }

    /// Return a borrowed item.
    ///
    /// A second return of the same loan fails with `AlreadyReturned`; the
    /// recorded return time never changes.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let returned = self.repository.loans.return_loan(loan_id).await?;

        tracing::info!("Loan {} returned (item {})", returned.id, returned.item_id);

        Ok(returned)
    }

    /// Get loan by ID
    pub async fn get_loan(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(loan_id).await
    }
}
