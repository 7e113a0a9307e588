//! SeaORM unit of work: repositories bound to one `DatabaseTransaction`

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use super::id_tag_repository::SeaOrmIdTagRepository;
use super::meter_value_repository::SeaOrmMeterValueRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::transaction_repository::SeaOrmTransactionRepository;
use crate::domain::id_tag::IdTagRepository;
use crate::domain::meter_value::MeterValueRepository;
use crate::domain::repositories::UnitOfWork;
use crate::domain::reservation::ReservationRepository;
use crate::domain::transaction::TransactionRepository;
use crate::domain::{DomainError, DomainResult};

type Txn = Arc<DatabaseTransaction>;

/// Dropping an uncommitted unit rolls the database transaction back.
pub struct SeaOrmUnitOfWork {
    txn: Txn,
    id_tags: SeaOrmIdTagRepository<Txn>,
    transactions: SeaOrmTransactionRepository<Txn>,
    reservations: SeaOrmReservationRepository<Txn>,
    meter_values: SeaOrmMeterValueRepository<Txn>,
}

impl SeaOrmUnitOfWork {
    pub fn new(txn: DatabaseTransaction) -> Self {
        let txn = Arc::new(txn);
        Self {
            id_tags: SeaOrmIdTagRepository::new(txn.clone()),
            transactions: SeaOrmTransactionRepository::new(txn.clone()),
            reservations: SeaOrmReservationRepository::new(txn.clone()),
            meter_values: SeaOrmMeterValueRepository::new(txn.clone()),
            txn,
        }
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn id_tags(&self) -> &dyn IdTagRepository {
        &self.id_tags
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

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let SeaOrmUnitOfWork {
            txn,
            id_tags,
            transactions,
            reservations,
            meter_values,
        } = *self;
        drop((id_tags, transactions, reservations, meter_values));

        let txn = Arc::try_unwrap(txn).map_err(|_| {
            DomainError::Storage("unit of work transaction is still shared".to_string())
        })?;
        txn.commit().await?;
        Ok(())
    }
}
