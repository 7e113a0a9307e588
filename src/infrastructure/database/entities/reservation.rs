//! Reservation entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub charge_point_id: String,

    /// 0 = any connector
    pub connector_id: i32,
    pub id_tag: String,

    pub expiry_date: DateTimeUtc,

    /// Reservation status: Accepted, Used, Cancelled, Expired
    pub status: String,

    /// Consuming transaction, written together with `Used`
    #[sea_orm(nullable)]
    pub transaction_id: Option<i32>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
