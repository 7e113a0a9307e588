//! Charge Point repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::ChargePoint;
use crate::domain::{DomainResult, OcppVersion};

#[async_trait]
pub trait ChargePointRepository: Send + Sync {
    /// Insert a new registration; `Conflict` if the id is taken.
    async fn save(&self, charge_point: ChargePoint) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargePoint>>;
    async fn find_all(&self) -> DomainResult<Vec<ChargePoint>>;
    /// Overwrite the recorded protocol; returns false for unknown ids.
    async fn update_protocol(&self, id: &str, protocol: OcppVersion) -> DomainResult<bool>;
    async fn touch_heartbeat(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool>;
}
