//! SeaORM implementation of ConnectorStatusRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::DbHandle;
use crate::domain::connector::{
    ChargePointErrorCode, ConnectorStatus, ConnectorStatusRecord, ConnectorStatusRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::connector_status;

pub struct SeaOrmConnectorStatusRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmConnectorStatusRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: connector_status::Model) -> DomainResult<ConnectorStatusRecord> {
    Ok(ConnectorStatusRecord {
        status: m.status.parse::<ConnectorStatus>().map_err(DomainError::Storage)?,
        error_code: m
            .error_code
            .parse::<ChargePointErrorCode>()
            .map_err(DomainError::Storage)?,
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id as u32,
        info: m.info,
        timestamp: m.timestamp,
    })
}

#[async_trait]
impl<C: DbHandle> ConnectorStatusRepository for SeaOrmConnectorStatusRepository<C> {
    async fn upsert(&self, record: ConnectorStatusRecord) -> DomainResult<()> {
        let model = connector_status::ActiveModel {
            charge_point_id: Set(record.charge_point_id),
            connector_id: Set(record.connector_id as i32),
            status: Set(record.status.as_str().to_string()),
            error_code: Set(record.error_code.as_str().to_string()),
            info: Set(record.info),
            timestamp: Set(record.timestamp),
        };

        connector_status::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    connector_status::Column::ChargePointId,
                    connector_status::Column::ConnectorId,
                ])
                .update_columns([
                    connector_status::Column::Status,
                    connector_status::Column::ErrorCode,
                    connector_status::Column::Info,
                    connector_status::Column::Timestamp,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db.conn())
            .await?;
        Ok(())
    }

    async fn find(
        &self,
        charge_point_id: &str,
        connector_id: u32,
    ) -> DomainResult<Option<ConnectorStatusRecord>> {
        connector_status::Entity::find_by_id((charge_point_id.to_string(), connector_id as i32))
            .one(self.db.conn())
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<ConnectorStatusRecord>> {
        connector_status::Entity::find()
            .filter(connector_status::Column::ChargePointId.eq(charge_point_id))
            .order_by_asc(connector_status::Column::ConnectorId)
            .all(self.db.conn())
            .await?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}
