//! SeaORM implementation of TransactionRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::DbHandle;
use crate::domain::transaction::{
    NewTransaction, Transaction, TransactionRepository, TransactionStop,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::transaction;

pub struct SeaOrmTransactionRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmTransactionRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: transaction::Model) -> Transaction {
    let stop = match (m.stop_timestamp, m.meter_stop) {
        (Some(timestamp), Some(meter_value)) => Some(TransactionStop {
            timestamp,
            meter_value,
            reason: m.stop_reason,
            id_tag: m.stop_id_tag,
        }),
        _ => None,
    };

    Transaction {
        id: m.id,
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id as u32,
        id_tag: m.id_tag,
        start_timestamp: m.start_timestamp,
        meter_start: m.meter_start,
        reservation_id: m.reservation_id,
        stop,
    }
}

// ── TransactionRepository impl ──────────────────────────────────

#[async_trait]
impl<C: DbHandle> TransactionRepository for SeaOrmTransactionRepository<C> {
    async fn insert(&self, tx: NewTransaction) -> DomainResult<Transaction> {
        let model = transaction::ActiveModel {
            id: NotSet,
            charge_point_id: Set(tx.charge_point_id),
            connector_id: Set(tx.connector_id as i32),
            id_tag: Set(tx.id_tag),
            start_timestamp: Set(tx.start_timestamp),
            meter_start: Set(tx.meter_start),
            reservation_id: Set(None),
            stop_timestamp: Set(None),
            meter_stop: Set(None),
            stop_reason: Set(None),
            stop_id_tag: Set(None),
        };
        let inserted = model.insert(self.db.conn()).await?;
        debug!(transaction_id = inserted.id, "Inserted transaction");
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find_by_id(id)
            .one(self.db.conn())
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn link_reservation(&self, id: i32, reservation_id: i32) -> DomainResult<bool> {
        let result = transaction::Entity::update_many()
            .col_expr(transaction::Column::ReservationId, Expr::value(reservation_id))
            .filter(transaction::Column::Id.eq(id))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn close(&self, id: i32, stop: TransactionStop) -> DomainResult<bool> {
        let result = transaction::Entity::update_many()
            .col_expr(transaction::Column::StopTimestamp, Expr::value(stop.timestamp))
            .col_expr(transaction::Column::MeterStop, Expr::value(stop.meter_value))
            .col_expr(transaction::Column::StopReason, Expr::value(stop.reason))
            .col_expr(transaction::Column::StopIdTag, Expr::value(stop.id_tag))
            .filter(transaction::Column::Id.eq(id))
            .filter(transaction::Column::StopTimestamp.is_null())
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn count_open_for_tag(&self, id_tag: &str) -> DomainResult<u64> {
        let count = transaction::Entity::find()
            .filter(transaction::Column::IdTag.eq(id_tag))
            .filter(transaction::Column::StopTimestamp.is_null())
            .count(self.db.conn())
            .await?;
        Ok(count)
    }

    async fn find_by_charge_point(&self, charge_point_id: &str) -> DomainResult<Vec<Transaction>> {
        let models = transaction::Entity::find()
            .filter(transaction::Column::ChargePointId.eq(charge_point_id))
            .order_by_asc(transaction::Column::Id)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Transaction>> {
        let models = transaction::Entity::find()
            .order_by_asc(transaction::Column::Id)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
