//! SeaORM implementation of ChargePointRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, warn};

use super::DbHandle;
use crate::domain::charge_point::{ChargePoint, ChargePointRepository};
use crate::domain::{DomainError, DomainResult, OcppVersion};
use crate::infrastructure::database::entities::charge_point;

pub struct SeaOrmChargePointRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmChargePointRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: charge_point::Model) -> ChargePoint {
    let ocpp_protocol = m.ocpp_protocol.as_deref().and_then(|p| match p.parse() {
        Ok(version) => Some(version),
        Err(_) => {
            warn!(charge_point_id = %m.id, protocol = p, "Unrecognized stored protocol");
            None
        }
    });

    ChargePoint {
        id: m.id,
        ocpp_protocol,
        registered_at: m.registered_at,
        last_heartbeat_at: m.last_heartbeat_at,
    }
}

// ── ChargePointRepository impl ──────────────────────────────────

#[async_trait]
impl<C: DbHandle> ChargePointRepository for SeaOrmChargePointRepository<C> {
    async fn save(&self, cp: ChargePoint) -> DomainResult<()> {
        debug!(charge_point_id = %cp.id, "Saving charge point");

        let existing = charge_point::Entity::find_by_id(cp.id.clone())
            .one(self.db.conn())
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!("Charge point {}", cp.id)));
        }

        let model = charge_point::ActiveModel {
            id: Set(cp.id),
            ocpp_protocol: Set(cp.ocpp_protocol.map(|v| v.as_str().to_string())),
            registered_at: Set(cp.registered_at),
            last_heartbeat_at: Set(cp.last_heartbeat_at),
        };
        charge_point::Entity::insert(model)
            .exec_without_returning(self.db.conn())
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargePoint>> {
        let model = charge_point::Entity::find_by_id(id.to_string())
            .one(self.db.conn())
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<ChargePoint>> {
        let models = charge_point::Entity::find()
            .order_by_asc(charge_point::Column::Id)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_protocol(&self, id: &str, protocol: OcppVersion) -> DomainResult<bool> {
        let result = charge_point::Entity::update_many()
            .col_expr(
                charge_point::Column::OcppProtocol,
                Expr::value(protocol.as_str()),
            )
            .filter(charge_point::Column::Id.eq(id))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn touch_heartbeat(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        let result = charge_point::Entity::update_many()
            .col_expr(charge_point::Column::LastHeartbeatAt, Expr::value(at))
            .filter(charge_point::Column::Id.eq(id))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }
}
