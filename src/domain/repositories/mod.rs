//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `UnitOfWork`: the repositories bound to one all-or-nothing storage transaction

use async_trait::async_trait;

use super::charge_point::ChargePointRepository;
use super::connector::ConnectorStatusRepository;
use super::id_tag::IdTagRepository;
use super::meter_value::MeterValueRepository;
use super::reservation::ReservationRepository;
use super::transaction::TransactionRepository;
use super::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let cp = repos.charge_points().find_by_id("CP001").await?;
///     let tx = repos.transactions().find_by_id(7).await?;
/// }
/// ```
///
/// Writes through these accessors are committed individually. Multi-entity
/// updates go through [`RepositoryProvider::begin`].
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn charge_points(&self) -> &dyn ChargePointRepository;
    fn id_tags(&self) -> &dyn IdTagRepository;
    fn connectors(&self) -> &dyn ConnectorStatusRepository;
    fn transactions(&self) -> &dyn TransactionRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn meter_values(&self) -> &dyn MeterValueRepository;

    /// Open a unit of work.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

// ── UnitOfWork ──────────────────────────────────────────────────

/// Repositories sharing one storage transaction.
///
/// Reads observe the unit's own pending writes. Nothing becomes visible to
/// other readers until [`UnitOfWork::commit`]; dropping the unit without
/// committing discards every write made through it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn id_tags(&self) -> &dyn IdTagRepository;
    fn transactions(&self) -> &dyn TransactionRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn meter_values(&self) -> &dyn MeterValueRepository;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
