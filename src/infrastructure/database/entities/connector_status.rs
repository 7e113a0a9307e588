//! Connector status entity
//!
//! One row per (charge point, connector); connector 0 is the controller.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "connector_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub charge_point_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub connector_id: i32,

    /// Available, Preparing, Charging, ...
    pub status: String,

    pub error_code: String,

    #[sea_orm(nullable)]
    pub info: Option<String>,

    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
