//! Sampled meter value entity
//!
//! Append-only; `id` orders rows by arrival.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "meter_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub charge_point_id: String,
    pub connector_id: i32,

    #[sea_orm(nullable)]
    pub transaction_id: Option<i32>,

    pub timestamp: DateTimeUtc,

    /// Reported value, stored verbatim
    pub value: String,

    #[sea_orm(nullable)]
    pub context: Option<String>,
    #[sea_orm(nullable)]
    pub format: Option<String>,
    #[sea_orm(nullable)]
    pub measurand: Option<String>,
    #[sea_orm(nullable)]
    pub phase: Option<String>,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[sea_orm(nullable)]
    pub unit: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
