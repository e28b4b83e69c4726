//! Data models for the ledger core

pub mod item;
pub mod loan;
pub mod member;

pub use item::{CreateItem, Item};
pub use loan::{ActiveLoan, CreateLoan, Loan, LoanRecord, MemberLoan};
pub use member::{CreateMember, Member};
