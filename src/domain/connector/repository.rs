//! Connector status repository interface

use async_trait::async_trait;

use super::model::ConnectorStatusRecord;
use crate::domain::DomainResult;

#[async_trait]
pub trait ConnectorStatusRepository: Send + Sync {
    /// Replace the current record for `(charge_point_id, connector_id)`,
    /// inserting it if absent.
    async fn upsert(&self, record: ConnectorStatusRecord) -> DomainResult<()>;

    async fn find(
        &self,
        charge_point_id: &str,
        connector_id: u32,
    ) -> DomainResult<Option<ConnectorStatusRecord>>;

    /// All connectors of a charge point ordered by connector id
    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<ConnectorStatusRecord>>;
}
