//! OCPP tag entity for database

use sea_orm::entity::prelude::*;

/// Stored authorization status
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TagStatus {
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Blocked")]
    Blocked,
    #[sea_orm(string_value = "Expired")]
    Expired,
    #[sea_orm(string_value = "Invalid")]
    Invalid,
    #[sea_orm(string_value = "ConcurrentTx")]
    ConcurrentTx,
}

/// RFID cards/tokens known to the central system
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ocpp_tags")]
pub struct Model {
    /// The ID tag value (RFID card number)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_tag: String,

    pub status: TagStatus,

    /// Parent ID tag (for group authorization)
    #[sea_orm(nullable)]
    pub parent_id_tag: Option<String>,

    #[sea_orm(nullable)]
    pub expiry_date: Option<DateTimeUtc>,

    /// Set while an open transaction references the tag
    pub in_transaction: bool,

    #[sea_orm(nullable)]
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
