//! ChargePoint entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "charge_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Protocol string reported at boot, e.g. `ocpp1.6`
    #[sea_orm(nullable)]
    pub ocpp_protocol: Option<String>,

    pub registered_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub last_heartbeat_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
