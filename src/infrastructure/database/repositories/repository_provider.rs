//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::charge_point::ChargePointRepository;
use crate::domain::connector::ConnectorStatusRepository;
use crate::domain::id_tag::IdTagRepository;
use crate::domain::meter_value::MeterValueRepository;
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::reservation::ReservationRepository;
use crate::domain::transaction::TransactionRepository;
use crate::domain::DomainResult;

use super::charge_point_repository::SeaOrmChargePointRepository;
use super::connector_status_repository::SeaOrmConnectorStatusRepository;
use super::id_tag_repository::SeaOrmIdTagRepository;
use super::meter_value_repository::SeaOrmMeterValueRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::transaction_repository::SeaOrmTransactionRepository;
use super::unit_of_work::SeaOrmUnitOfWork;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let cp = repos.charge_points().find_by_id("CP001").await?;
/// let uow = repos.begin().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    charge_points: SeaOrmChargePointRepository,
    id_tags: SeaOrmIdTagRepository,
    connectors: SeaOrmConnectorStatusRepository,
    transactions: SeaOrmTransactionRepository,
    reservations: SeaOrmReservationRepository,
    meter_values: SeaOrmMeterValueRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            charge_points: SeaOrmChargePointRepository::new(db.clone()),
            id_tags: SeaOrmIdTagRepository::new(db.clone()),
            connectors: SeaOrmConnectorStatusRepository::new(db.clone()),
            transactions: SeaOrmTransactionRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            meter_values: SeaOrmMeterValueRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn charge_points(&self) -> &dyn ChargePointRepository {
        &self.charge_points
    }

    fn id_tags(&self) -> &dyn IdTagRepository {
        &self.id_tags
    }

    fn connectors(&self) -> &dyn ConnectorStatusRepository {
        &self.connectors
    }

    fn transactions(&self) -> &dyn TransactionRepository {
        &self.transactions
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn meter_values(&self) -> &dyn MeterValueRepository {
        &self.meter_values
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn)))
    }
}
