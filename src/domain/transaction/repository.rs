//! Transaction repository interface

use async_trait::async_trait;

use super::model::{NewTransaction, Transaction, TransactionStop};
use crate::domain::DomainResult;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert an open transaction and return it with its assigned id
    async fn insert(&self, transaction: NewTransaction) -> DomainResult<Transaction>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Transaction>>;
    /// Record the consumed reservation; returns false for unknown ids.
    async fn link_reservation(&self, id: i32, reservation_id: i32) -> DomainResult<bool>;
    /// Close an open transaction. Returns false when the transaction is
    /// missing or was already closed.
    async fn close(&self, id: i32, stop: TransactionStop) -> DomainResult<bool>;
    /// Number of open transactions started with `id_tag`
    async fn count_open_for_tag(&self, id_tag: &str) -> DomainResult<u64>;
    async fn find_by_charge_point(&self, charge_point_id: &str) -> DomainResult<Vec<Transaction>>;
    async fn find_all(&self) -> DomainResult<Vec<Transaction>>;
}
