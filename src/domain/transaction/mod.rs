//! Transaction aggregate
//!
//! Contains the Transaction entity, its stop record, and repository interface.

pub mod model;
pub mod repository;

pub use model::{NewTransaction, Transaction, TransactionStop};
pub use repository::TransactionRepository;
