//! Charge point identity, boot and heartbeat handling

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{BootOutcome, ChargePoint, DomainResult, OcppVersion, RepositoryProvider};

/// Service for charge point business operations
pub struct ChargePointService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ChargePointService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Out-of-band registration; `Conflict` if the id is already known.
    pub async fn register_charge_point(&self, charge_point_id: &str) -> DomainResult<ChargePoint> {
        let cp = ChargePoint::new(charge_point_id);
        self.repos.charge_points().save(cp.clone()).await?;
        info!(charge_point_id, "Charge point registered");
        Ok(cp)
    }

    pub async fn resolve_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Option<ChargePoint>> {
        self.repos.charge_points().find_by_id(charge_point_id).await
    }

    pub async fn list_charge_points(&self) -> DomainResult<Vec<ChargePoint>> {
        self.repos.charge_points().find_all().await
    }

    /// Accept a boot from a registered charge point and record the protocol
    /// it spoke. Unknown ids are rejected with no side effects.
    pub async fn boot(
        &self,
        charge_point_id: &str,
        protocol: OcppVersion,
        vendor: &str,
        model: &str,
    ) -> DomainResult<BootOutcome> {
        if !self
            .repos
            .charge_points()
            .update_protocol(charge_point_id, protocol)
            .await?
        {
            warn!(charge_point_id, vendor, model, "Boot from unregistered charge point rejected");
            return Ok(BootOutcome::Rejected);
        }

        info!(
            charge_point_id,
            vendor,
            model,
            protocol = protocol.as_str(),
            "Boot accepted"
        );
        Ok(BootOutcome::Accepted)
    }

    /// Record a heartbeat and return the central system time
    pub async fn heartbeat(&self, charge_point_id: &str) -> DomainResult<DateTime<Utc>> {
        let now = Utc::now();
        if !self
            .repos
            .charge_points()
            .touch_heartbeat(charge_point_id, now)
            .await?
        {
            warn!(charge_point_id, "Heartbeat from unregistered charge point");
        }
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn service() -> ChargePointService {
        ChargePointService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    #[tokio::test]
    async fn unknown_charge_point_is_rejected_without_side_effects() {
        let svc = service();
        let outcome = svc.boot("GHOST", OcppVersion::V16, "Acme", "X1").await.unwrap();
        assert_eq!(outcome, BootOutcome::Rejected);
        assert!(svc.resolve_charge_point("GHOST").await.unwrap().is_none());
        assert!(svc.list_charge_points().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn boot_overwrites_protocol() {
        let svc = service();
        svc.register_charge_point("CP001").await.unwrap();

        assert_eq!(
            svc.boot("CP001", OcppVersion::V15, "Acme", "X1").await.unwrap(),
            BootOutcome::Accepted
        );
        assert_eq!(
            svc.boot("CP001", OcppVersion::V16, "Acme", "X1").await.unwrap(),
            BootOutcome::Accepted
        );

        let cp = svc.resolve_charge_point("CP001").await.unwrap().unwrap();
        assert_eq!(cp.ocpp_protocol, Some(OcppVersion::V16));
        assert!(cp.ocpp_protocol.unwrap().as_str().contains("ocpp1.6"));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = service();
        svc.register_charge_point("CP001").await.unwrap();
        let err = svc.register_charge_point("CP001").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn heartbeat_updates_known_charge_point() {
        let svc = service();
        svc.register_charge_point("CP001").await.unwrap();
        let at = svc.heartbeat("CP001").await.unwrap();
        let cp = svc.resolve_charge_point("CP001").await.unwrap().unwrap();
        assert_eq!(cp.last_heartbeat_at, Some(at));

        // Unknown ids still get the time
        svc.heartbeat("GHOST").await.unwrap();
    }
}
