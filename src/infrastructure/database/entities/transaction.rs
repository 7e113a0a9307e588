//! Transaction entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub charge_point_id: String,
    pub connector_id: i32,

    /// Tag that started the transaction
    pub id_tag: String,

    pub start_timestamp: DateTimeUtc,
    pub meter_start: i32,

    #[sea_orm(nullable)]
    pub reservation_id: Option<i32>,

    /// Null while the transaction is open
    #[sea_orm(nullable)]
    pub stop_timestamp: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub meter_stop: Option<i32>,

    #[sea_orm(nullable)]
    pub stop_reason: Option<String>,

    #[sea_orm(nullable)]
    pub stop_id_tag: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meter_value::Entity")]
    MeterValues,
}

impl Related<super::meter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeterValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
