//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::DbHandle;
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmReservationRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("reservation {} has unknown status {}", m.id, m.status))
    })?;

    Ok(Reservation {
        id: m.id,
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id as u32,
        id_tag: m.id_tag,
        expiry_date: m.expiry_date,
        status,
        transaction_id: m.transaction_id,
        created_at: m.created_at,
    })
}

fn models_to_domain(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl<C: DbHandle> ReservationRepository for SeaOrmReservationRepository<C> {
    async fn insert(&self, r: NewReservation) -> DomainResult<Reservation> {
        let model = reservation::ActiveModel {
            id: NotSet,
            charge_point_id: Set(r.charge_point_id),
            connector_id: Set(r.connector_id as i32),
            id_tag: Set(r.id_tag),
            expiry_date: Set(r.expiry_date),
            status: Set(ReservationStatus::Accepted.as_str().to_string()),
            transaction_id: Set(None),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(self.db.conn()).await?;
        debug!(reservation_id = inserted.id, "Inserted reservation");
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn transition(
        &self,
        id: i32,
        to: ReservationStatus,
        transaction_id: Option<i32>,
    ) -> DomainResult<bool> {
        if !ReservationStatus::Accepted.can_transition_to(to) {
            return Err(DomainError::Validation(format!(
                "reservation cannot move to {}",
                to
            )));
        }

        let mut update = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(to.as_str()));
        if let Some(transaction_id) = transaction_id {
            update = update.col_expr(
                reservation::Column::TransactionId,
                Expr::value(transaction_id),
            );
        }

        let result = update
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Accepted.as_str()))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Accepted.as_str()))
            .filter(reservation::Column::ExpiryDate.lt(now))
            .order_by_asc(reservation::Column::Id)
            .all(self.db.conn())
            .await?;
        models_to_domain(models)
    }

    async fn find_active_for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::ChargePointId.eq(charge_point_id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Accepted.as_str()))
            .order_by_asc(reservation::Column::Id)
            .all(self.db.conn())
            .await?;
        models_to_domain(models)
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_asc(reservation::Column::Id)
            .all(self.db.conn())
            .await?;
        models_to_domain(models)
    }
}
