//! Biblion Lending Ledger
//!
//! The transactional core of the Biblion library system: a catalog of
//! lendable items, a directory of members, and the loan ledger binding the
//! two. Borrow and return are atomic multi-entity transitions; an item's
//! availability flag never disagrees with the existence of an open loan.
//!
//! This crate is a library-level contract. Transport layers (HTTP, CLI)
//! translate external identifiers into the typed ids used here and map
//! [`AppError`] variants onto their own response vocabulary.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
