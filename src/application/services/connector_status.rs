//! Connector status projection

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ConnectorStatusRecord, DomainResult, RepositoryProvider};

pub struct ConnectorStatusTracker {
    repos: Arc<dyn RepositoryProvider>,
}

impl ConnectorStatusTracker {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Overwrite the current status of one connector. No transition checks;
    /// the last notification received wins.
    pub async fn record(&self, record: ConnectorStatusRecord) -> DomainResult<()> {
        debug!(
            charge_point_id = %record.charge_point_id,
            connector_id = record.connector_id,
            status = %record.status,
            error_code = %record.error_code,
            "Connector status"
        );
        self.repos.connectors().upsert(record).await
    }

    pub async fn current(
        &self,
        charge_point_id: &str,
        connector_id: u32,
    ) -> DomainResult<Option<ConnectorStatusRecord>> {
        self.repos.connectors().find(charge_point_id, connector_id).await
    }

    pub async fn for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<ConnectorStatusRecord>> {
        self.repos.connectors().find_by_charge_point(charge_point_id).await
    }
}
