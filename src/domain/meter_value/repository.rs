//! Meter value repository interface

use async_trait::async_trait;

use super::model::{NewSampledValue, SampledValueRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait MeterValueRepository: Send + Sync {
    /// Append readings in the given order. Records are never updated.
    async fn append(&self, values: Vec<NewSampledValue>) -> DomainResult<()>;

    /// Readings associated with a transaction, in arrival order
    async fn find_by_transaction(&self, transaction_id: i32)
        -> DomainResult<Vec<SampledValueRecord>>;

    /// Readings reported by a charge point, in arrival order
    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<SampledValueRecord>>;
}
