//! SeaORM implementation of MeterValueRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::DbHandle;
use crate::domain::meter_value::{
    MeterValueRepository, NewSampledValue, SampledReading, SampledValueRecord,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::meter_value;

pub struct SeaOrmMeterValueRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmMeterValueRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: meter_value::Model) -> SampledValueRecord {
    SampledValueRecord {
        id: i64::from(m.id),
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id as u32,
        transaction_id: m.transaction_id,
        timestamp: m.timestamp,
        reading: SampledReading {
            value: m.value,
            context: m.context,
            format: m.format,
            measurand: m.measurand,
            phase: m.phase,
            location: m.location,
            unit: m.unit,
        },
    }
}

fn domain_to_active(v: NewSampledValue) -> meter_value::ActiveModel {
    meter_value::ActiveModel {
        id: NotSet,
        charge_point_id: Set(v.charge_point_id),
        connector_id: Set(v.connector_id as i32),
        transaction_id: Set(v.transaction_id),
        timestamp: Set(v.timestamp),
        value: Set(v.reading.value),
        context: Set(v.reading.context),
        format: Set(v.reading.format),
        measurand: Set(v.reading.measurand),
        phase: Set(v.reading.phase),
        location: Set(v.reading.location),
        unit: Set(v.reading.unit),
    }
}

#[async_trait]
impl<C: DbHandle> MeterValueRepository for SeaOrmMeterValueRepository<C> {
    async fn append(&self, values: Vec<NewSampledValue>) -> DomainResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        meter_value::Entity::insert_many(values.into_iter().map(domain_to_active))
            .exec_without_returning(self.db.conn())
            .await?;
        Ok(())
    }

    async fn find_by_transaction(
        &self,
        transaction_id: i32,
    ) -> DomainResult<Vec<SampledValueRecord>> {
        let models = meter_value::Entity::find()
            .filter(meter_value::Column::TransactionId.eq(transaction_id))
            .order_by_asc(meter_value::Column::Id)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<SampledValueRecord>> {
        let models = meter_value::Entity::find()
            .filter(meter_value::Column::ChargePointId.eq(charge_point_id))
            .order_by_asc(meter_value::Column::Id)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
